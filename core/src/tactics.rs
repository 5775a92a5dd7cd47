//! Tactical choices and pitch conditions supplied per request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalApproach {
    Aggressive,
    Balanced,
    Cautious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BowlingLength {
    GoodLength,
    Short,
    Yorkers,
    FullPitched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldSetting {
    Attacking,
    Balanced,
    Defensive,
    DeathField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingTactics {
    pub approach: TacticalApproach,
}

impl BattingTactics {
    pub fn new(approach: TacticalApproach) -> Self {
        Self { approach }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingTactics {
    pub length: BowlingLength,
    pub field_setting: FieldSetting,
}

impl BowlingTactics {
    pub fn new(length: BowlingLength, field_setting: FieldSetting) -> Self {
        Self { length, field_setting }
    }
}

/// Surface characteristics. Carried through the context but not yet
/// consulted by the modifier pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchConditions {
    pub pace:   u8,
    pub spin:   u8,
    pub bounce: u8,
    #[serde(default)]
    pub deterioration: u8,
}

impl Default for PitchConditions {
    fn default() -> Self {
        Self { pace: 50, spin: 50, bounce: 50, deterioration: 0 }
    }
}
