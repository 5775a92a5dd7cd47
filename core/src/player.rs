//! Player skill snapshots.
//!
//! PlayerSkills is owned by the caller and only read by the engine.
//! All ratings are 0–100 except form, which is −20..+20.

use crate::{
    error::{SimError, SimResult},
    types::PlayerId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingSkills {
    pub technique:   u8,
    pub power:       u8,
    pub timing:      u8,
    pub temperament: u8,
}

impl BattingSkills {
    /// Weighted batting score on the 0–100 scale.
    pub fn weighted(&self) -> f64 {
        self.technique as f64 * 0.25
            + self.power as f64 * 0.25
            + self.timing as f64 * 0.30
            + self.temperament as f64 * 0.20
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingSkills {
    pub speed:     u8,
    pub accuracy:  u8,
    pub variation: u8,
    pub stamina:   u8,
}

impl BowlingSkills {
    /// Weighted bowling score on the 0–100 scale.
    pub fn weighted(&self) -> f64 {
        self.speed as f64 * 0.20
            + self.accuracy as f64 * 0.35
            + self.variation as f64 * 0.25
            + self.stamina as f64 * 0.20
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldingSkills {
    pub catching:    u8,
    pub ground:      u8,
    pub throwing:    u8,
    pub athleticism: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Batter,
    Bowler,
    Allrounder,
    Keeper,
}

impl PlayerRole {
    /// Roles a captain would normally throw the ball to.
    pub fn bowls(&self) -> bool {
        matches!(self, Self::Bowler | Self::Allrounder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BowlingStyle {
    RightArmFast,
    RightArmMedium,
    LeftArmFast,
    LeftArmMedium,
    OffSpin,
    LegSpin,
    LeftArmSpin,
}

impl BowlingStyle {
    pub fn is_spin(&self) -> bool {
        matches!(self, Self::OffSpin | Self::LegSpin | Self::LeftArmSpin)
    }

    /// Genuine quicks only; medium pacers are neither "fast" nor spin.
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::RightArmFast | Self::LeftArmFast)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSkills {
    pub id:         PlayerId,
    pub name:       String,
    pub short_name: String,
    pub role:       PlayerRole,
    #[serde(default)]
    pub bowling_style: Option<BowlingStyle>,

    pub batting:  BattingSkills,
    pub bowling:  BowlingSkills,
    pub fielding: FieldingSkills,

    // Dynamic state
    pub form:    i8,
    pub fitness: u8,
    pub morale:  u8,
    pub fatigue: u8,
}

impl PlayerSkills {
    pub fn is_spinner(&self) -> bool {
        self.bowling_style.is_some_and(|s| s.is_spin())
    }

    pub fn is_fast_bowler(&self) -> bool {
        self.bowling_style.is_some_and(|s| s.is_fast())
    }

    /// Reject ratings outside their documented ranges.
    pub fn validate(&self) -> SimResult<()> {
        let ratings = [
            ("batting.technique",    self.batting.technique),
            ("batting.power",        self.batting.power),
            ("batting.timing",       self.batting.timing),
            ("batting.temperament",  self.batting.temperament),
            ("bowling.speed",        self.bowling.speed),
            ("bowling.accuracy",     self.bowling.accuracy),
            ("bowling.variation",    self.bowling.variation),
            ("bowling.stamina",      self.bowling.stamina),
            ("fielding.catching",    self.fielding.catching),
            ("fielding.ground",      self.fielding.ground),
            ("fielding.throwing",    self.fielding.throwing),
            ("fielding.athleticism", self.fielding.athleticism),
            ("fitness",              self.fitness),
            ("morale",               self.morale),
            ("fatigue",              self.fatigue),
        ];
        if let Some((field, value)) = ratings.iter().find(|(_, v)| *v > 100) {
            return Err(SimError::InvalidPlayer {
                player_id: self.id.clone(),
                reason:    format!("{field}={value} exceeds 100"),
            });
        }
        if !(-20..=20).contains(&self.form) {
            return Err(SimError::InvalidPlayer {
                player_id: self.id.clone(),
                reason:    format!("form={} outside -20..=20", self.form),
            });
        }
        Ok(())
    }
}

/// Find a player by id in a roster.
pub fn find_player<'a>(roster: &'a [PlayerSkills], id: &str) -> Option<&'a PlayerSkills> {
    roster.iter().find(|p| p.id == id)
}
