use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Cannot read {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid probability config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Player '{player_id}' has invalid attributes: {reason}")]
    InvalidPlayer { player_id: String, reason: String },

    #[error("Striker '{player_id}' is not in the batting roster")]
    UnknownStriker { player_id: String },

    #[error("Striker mismatch: state has '{expected}' on strike, request sent '{actual}'")]
    StrikerMismatch { expected: String, actual: String },

    #[error("Bowler '{player_id}' is not in the bowling roster")]
    UnknownBowler { player_id: String },

    #[error("Bowler '{player_id}' is not eligible: {reason}")]
    BowlerIneligible { player_id: String, reason: String },

    #[error("No eligible bowler available")]
    NoEligibleBowler,

    #[error("Invalid innings state: {reason}")]
    InvalidState { reason: String },

    #[error("Innings already complete")]
    InningsComplete,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
