//! The result of one delivery.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    Wide,
    NoBall,
}

/// Exactly one per ball. Wides and no-balls are the only illegal deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Runs {
        runs: u32,
        #[serde(default)]
        boundary_saved: bool,
    },
    Wicket {
        dismissal: DismissalKind,
        #[serde(default)]
        runs_before_dismissal: u32,
    },
    Extra {
        kind: ExtraKind,
        runs: u32,
    },
}

impl Outcome {
    pub const DOT: Outcome = Outcome::Runs { runs: 0, boundary_saved: false };

    pub fn runs(runs: u32) -> Self {
        Outcome::Runs { runs, boundary_saved: false }
    }

    pub fn wicket(dismissal: DismissalKind) -> Self {
        Outcome::Wicket { dismissal, runs_before_dismissal: 0 }
    }

    pub fn wide() -> Self {
        Outcome::Extra { kind: ExtraKind::Wide, runs: 1 }
    }

    pub fn no_ball() -> Self {
        Outcome::Extra { kind: ExtraKind::NoBall, runs: 1 }
    }

    /// Runs added to the team total.
    pub fn team_runs(&self) -> u32 {
        match *self {
            Outcome::Runs { runs, .. } => runs,
            Outcome::Wicket { runs_before_dismissal, .. } => runs_before_dismissal,
            Outcome::Extra { runs, .. } => runs,
        }
    }

    /// Counts toward the six-ball over.
    pub fn is_legal(&self) -> bool {
        !matches!(self, Outcome::Extra { .. })
    }

    pub fn is_wicket(&self) -> bool {
        matches!(self, Outcome::Wicket { .. })
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, Outcome::Runs { runs: 4 | 6, .. })
    }

    pub fn is_dot(&self) -> bool {
        matches!(self, Outcome::Runs { runs: 0, .. })
    }

    /// Short scorebook symbol: ".", "1".."6", "W", "wd", "nb".
    pub fn symbol(&self) -> String {
        match self {
            Outcome::Runs { runs: 0, .. } => ".".to_string(),
            Outcome::Runs { runs, .. } => runs.to_string(),
            Outcome::Wicket { .. } => "W".to_string(),
            Outcome::Extra { kind: ExtraKind::Wide, .. } => "wd".to_string(),
            Outcome::Extra { kind: ExtraKind::NoBall, .. } => "nb".to_string(),
        }
    }
}
