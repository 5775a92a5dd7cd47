//! Per-ball simulation context and the derived context helpers.
//!
//! A SimulationContext is rebuilt from the innings state before every
//! delivery. Partnership, recent wickets and bowler wickets change ball to
//! ball, so nothing here is cached.

use crate::{
    config::BatsmanThresholds,
    innings::{InningsState, OverSummary},
    player::PlayerSkills,
    tactics::{BattingTactics, BowlingLength, BowlingTactics, FieldSetting, PitchConditions, TacticalApproach},
    types::{BALLS_PER_OVER, INNINGS_BALLS},
};
use serde::{Deserialize, Serialize};

/// Legal balls that count as "recent" for wicket pressure (three overs).
pub const RECENT_WICKET_WINDOW_BALLS: u32 = 3 * BALLS_PER_OVER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Powerplay,
    Middle,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatsmanState {
    New,
    Settling,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    Batting,
    Neutral,
    Bowling,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Phase from decimal overs. Boundary values fall into the later phase:
/// exactly 6.0 is middle, exactly 16.0 is death.
pub fn phase_from_overs(overs: f64) -> MatchPhase {
    if overs < 6.0 {
        MatchPhase::Powerplay
    } else if overs < 16.0 {
        MatchPhase::Middle
    } else {
        MatchPhase::Death
    }
}

pub fn batsman_state(balls_faced: u32, thresholds: &BatsmanThresholds) -> BatsmanState {
    if balls_faced < thresholds.new {
        BatsmanState::New
    } else if balls_faced < thresholds.settling {
        BatsmanState::Settling
    } else {
        BatsmanState::Set
    }
}

/// Required runs per over, or None when no legal balls remain.
pub fn required_run_rate(target: u32, runs: u32, balls_remaining: u32) -> Option<f64> {
    if balls_remaining == 0 {
        return None;
    }
    let runs_needed = target as f64 - runs as f64;
    Some(runs_needed / balls_remaining as f64 * BALLS_PER_OVER as f64)
}

pub fn pressure_level(state: &InningsState, target: Option<u32>) -> PressureLevel {
    let Some(target) = target else {
        return PressureLevel::Low;
    };
    match required_run_rate(target, state.runs, state.balls_remaining()) {
        None                    => PressureLevel::High,
        Some(rr) if rr > 12.0   => PressureLevel::High,
        Some(rr) if rr > 9.0    => PressureLevel::Medium,
        Some(_)                 => PressureLevel::Low,
    }
}

/// Momentum from the last two completed overs.
pub fn momentum(overs: &[OverSummary]) -> Momentum {
    if overs.len() < 2 {
        return Momentum::Neutral;
    }
    let last_two = &overs[overs.len() - 2..];
    let runs: u32 = last_two.iter().map(|o| o.runs).sum();
    let wickets: u32 = last_two.iter().map(|o| o.wickets).sum();

    if wickets >= 2 {
        Momentum::Bowling
    } else if runs >= 20 {
        Momentum::Batting
    } else {
        Momentum::Neutral
    }
}

// ── Simulation context ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SimulationContext<'a> {
    pub striker: &'a PlayerSkills,
    pub bowler:  &'a PlayerSkills,

    pub phase:              MatchPhase,
    /// Decimal overs: complete overs plus balls / 6.
    pub overs:              f64,
    pub legal_balls_bowled: u32,
    pub wickets:            u32,
    pub target:             Option<u32>,
    pub current_runs:       u32,
    /// Balls faced by the striker this innings.
    pub balls_faced:        u32,

    pub batting_approach: TacticalApproach,
    pub bowling_length:   BowlingLength,
    pub field_setting:    FieldSetting,
    pub pitch:            PitchConditions,

    // Pressure
    pub partnership_runs: u32,
    pub recent_wickets:   u32,
    pub bowler_wickets:   u32,

    // Momentum over the trailing legal balls
    pub recent_runs:       u32,
    pub recent_boundaries: u32,
    pub recent_dots:       u32,
}

impl<'a> SimulationContext<'a> {
    /// Build the context for the next delivery from the current state.
    pub fn assemble(
        state:   &InningsState,
        striker: &'a PlayerSkills,
        bowler:  &'a PlayerSkills,
        batting: &BattingTactics,
        bowling: &BowlingTactics,
        pitch:   PitchConditions,
        target:  Option<u32>,
    ) -> Self {
        let legal_balls_bowled = state.legal_balls_bowled();
        let overs = state.overs as f64 + state.balls as f64 / BALLS_PER_OVER as f64;

        let recent_wickets = state
            .fall_of_wickets
            .iter()
            .filter(|fow| legal_balls_bowled.saturating_sub(fow.legal_ball()) < RECENT_WICKET_WINDOW_BALLS)
            .count() as u32;

        let (recent_runs, recent_boundaries, recent_dots) = state.recent_scoring();

        Self {
            striker,
            bowler,
            phase: phase_from_overs(overs),
            overs,
            legal_balls_bowled,
            wickets: state.wickets,
            target,
            current_runs: state.runs,
            balls_faced: state.batter(&striker.id).map_or(0, |b| b.balls),
            batting_approach: batting.approach,
            bowling_length: bowling.length,
            field_setting: bowling.field_setting,
            pitch,
            partnership_runs: state.partnership_runs(),
            recent_wickets,
            bowler_wickets: state.bowler(&bowler.id).map_or(0, |b| b.wickets),
            recent_runs,
            recent_boundaries,
            recent_dots,
        }
    }

    pub fn balls_remaining(&self) -> u32 {
        INNINGS_BALLS.saturating_sub(self.legal_balls_bowled)
    }
}
