//! The probability model - context in, normalized distribution out.
//!
//! STAGE ORDER (fixed, documented, never reordered):
//!   1. Base outcomes
//!   2. Phase
//!   3. Skill differential
//!   4. Form
//!   5. Batsman state
//!   6. Tactical approach
//!   7. Bowling length × length effectiveness
//!   8. Field setting
//!   9. Pressure then momentum buckets
//!  10. Chase pressure (target set, balls remaining)
//!  11. Normalize
//!
//! Each stage multiplies the distribution produced by the stage before it,
//! so effects compound. Every multiplier is non-negative, so no class can
//! go below zero.

use crate::{
    buckets::{CountBucket, DotsBand, PartnershipBand, RecentRunsBand, RequiredRateBand},
    config::{LengthModifier, LengthSkill, Modifier, ProbabilityConfig},
    context::{batsman_state, required_run_rate, SimulationContext},
    player::PlayerSkills,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Weight of the batting-minus-bowling differential on boundaries.
const SKILL_SENSITIVITY: f64 = 0.15;
/// Form of ±20 moves boundaries (batter) or wickets (bowler) by ±10%.
const FORM_DIVISOR: f64 = 200.0;
const FORM_LIMIT: f64 = 20.0;

const MIN_LENGTH_EFFECTIVENESS: f64 = 0.5;
const MAX_LENGTH_EFFECTIVENESS: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Dot,
    Single,
    Two,
    Three,
    Four,
    Six,
    Wicket,
}

impl OutcomeClass {
    /// Sampling order used by the resolver.
    pub const ALL: [OutcomeClass; 7] = [
        OutcomeClass::Dot,
        OutcomeClass::Single,
        OutcomeClass::Two,
        OutcomeClass::Three,
        OutcomeClass::Four,
        OutcomeClass::Six,
        OutcomeClass::Wicket,
    ];
}

/// One weight per outcome class. Normalized when returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub dot:    f64,
    pub single: f64,
    pub two:    f64,
    pub three:  f64,
    pub four:   f64,
    pub six:    f64,
    pub wicket: f64,
}

impl OutcomeProbabilities {
    pub fn get(&self, class: OutcomeClass) -> f64 {
        match class {
            OutcomeClass::Dot    => self.dot,
            OutcomeClass::Single => self.single,
            OutcomeClass::Two    => self.two,
            OutcomeClass::Three  => self.three,
            OutcomeClass::Four   => self.four,
            OutcomeClass::Six    => self.six,
            OutcomeClass::Wicket => self.wicket,
        }
    }

    /// Values in OutcomeClass::ALL order.
    pub fn values(&self) -> [f64; 7] {
        OutcomeClass::ALL.map(|class| self.get(class))
    }

    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }

    pub fn boundary(&self) -> f64 {
        self.four + self.six
    }

    pub fn apply(&mut self, m: Modifier) {
        self.four   *= m.boundary_mod;
        self.six    *= m.boundary_mod;
        self.wicket *= m.wicket_mod;
        self.dot    *= m.dot_mod;
        self.single *= m.single_mod;
    }

    /// Divide by the running total. None when there is no finite mass.
    pub fn normalized(&self) -> Option<Self> {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        Some(Self {
            dot:    self.dot / total,
            single: self.single / total,
            two:    self.two / total,
            three:  self.three / total,
            four:   self.four / total,
            six:    self.six / total,
            wicket: self.wicket / total,
        })
    }
}

/// Stateless apart from its immutable configuration; share freely.
#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    config: Arc<ProbabilityConfig>,
}

impl ProbabilityModel {
    pub fn new(config: Arc<ProbabilityConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbabilityConfig {
        &self.config
    }

    pub fn calculate_probabilities(&self, ctx: &SimulationContext<'_>) -> OutcomeProbabilities {
        let cfg = &*self.config;
        let mut probs = cfg.base_outcomes.to_probabilities();

        probs.apply(cfg.phase_modifiers.get(&ctx.phase));

        probs.apply(skill_modifier(ctx.striker, ctx.bowler));

        probs.apply(form_modifier(ctx.striker.form, ctx.bowler.form));

        let state = batsman_state(ctx.balls_faced, &cfg.batsman_state.thresholds);
        probs.apply(cfg.batsman_state.modifiers.get(&state));

        probs.apply(cfg.tactical_modifiers.get(&ctx.batting_approach));

        if let Some(length) = cfg.bowling_length_modifiers.get(&ctx.bowling_length) {
            let effectiveness = length_effectiveness(ctx.bowler, length);
            probs.apply(effective_length_modifier(length.modifier, effectiveness));
        }

        probs.apply(cfg.field_setting_modifiers.get(&ctx.field_setting));

        self.apply_pressure(&mut probs, ctx);
        self.apply_momentum(&mut probs, ctx);

        if let Some(target) = ctx.target {
            if let Some(rate) = required_run_rate(target, ctx.current_runs, ctx.balls_remaining()) {
                let band = RequiredRateBand::from_rate(rate);
                probs.apply(cfg.pressure.required_rate.get(&band));
            }
        }

        match probs.normalized() {
            Some(normalized) => normalized,
            None => {
                log::warn!("probability model: degenerate distribution {probs:?}, using base rates");
                self.base_distribution()
            }
        }
    }

    /// The configured base rates, normalized.
    pub fn base_distribution(&self) -> OutcomeProbabilities {
        let base = self.config.base_outcomes.to_probabilities();
        // validate() guarantees positive finite mass.
        base.normalized().unwrap_or(base)
    }

    fn apply_pressure(&self, probs: &mut OutcomeProbabilities, ctx: &SimulationContext<'_>) {
        let pressure = &self.config.pressure;
        probs.apply(pressure.recent_wickets.get(&CountBucket::from_count(ctx.recent_wickets)));
        probs.apply(pressure.bowler_on_roll.get(&CountBucket::from_count(ctx.bowler_wickets)));
        probs.apply(pressure.partnership.get(&PartnershipBand::from_runs(ctx.partnership_runs)));
    }

    fn apply_momentum(&self, probs: &mut OutcomeProbabilities, ctx: &SimulationContext<'_>) {
        let momentum = &self.config.momentum;
        probs.apply(momentum.recent_runs.get(&RecentRunsBand::from_runs(ctx.recent_runs)));
        probs.apply(momentum.recent_boundaries.get(&CountBucket::from_count(ctx.recent_boundaries)));
        probs.apply(momentum.recent_dots.get(&DotsBand::from_dots(ctx.recent_dots)));
    }
}

/// Batting minus bowling, each on the 0–100 scale, as a fraction in [-1, 1].
pub fn skill_differential(striker: &PlayerSkills, bowler: &PlayerSkills) -> f64 {
    ((striker.batting.weighted() - bowler.bowling.weighted()) / 100.0).clamp(-1.0, 1.0)
}

fn skill_modifier(striker: &PlayerSkills, bowler: &PlayerSkills) -> Modifier {
    let factor = 1.0 + skill_differential(striker, bowler) * SKILL_SENSITIVITY;
    Modifier::bw(factor, 1.0 / factor)
}

fn form_modifier(batter_form: i8, bowler_form: i8) -> Modifier {
    let batter = 1.0 + (batter_form as f64).clamp(-FORM_LIMIT, FORM_LIMIT) / FORM_DIVISOR;
    let bowler = 1.0 + (bowler_form as f64).clamp(-FORM_LIMIT, FORM_LIMIT) / FORM_DIVISOR;
    Modifier::bw(batter, bowler)
}

/// How well this bowler executes the chosen length, in [0.5, 1.3].
pub fn length_effectiveness(bowler: &PlayerSkills, length: &LengthModifier) -> f64 {
    let skill = match length.skill_type {
        LengthSkill::Speed     => bowler.bowling.speed,
        LengthSkill::Variation => bowler.bowling.variation,
        LengthSkill::Accuracy  => bowler.bowling.accuracy,
    } as f64;
    let min_skill = length.min_skill as f64;

    if skill < min_skill {
        let deficit = (min_skill - skill) / 100.0;
        (1.0 - deficit * 2.0).max(MIN_LENGTH_EFFECTIVENESS)
    } else {
        let excess = (skill - min_skill) / 100.0;
        (1.0 + excess * 0.5).min(MAX_LENGTH_EFFECTIVENESS)
    }
}

/// The length's boundary and wicket multipliers, both scaled by effectiveness.
pub fn effective_length_modifier(base: Modifier, effectiveness: f64) -> Modifier {
    Modifier {
        boundary_mod: base.boundary_mod * effectiveness,
        wicket_mod:   base.wicket_mod * effectiveness,
        ..base
    }
}
