//! Outcome resolver - turns a distribution into one concrete delivery.
//!
//! Draw order per ball (tests that script draws depend on it):
//!   1. Primary draw: wide, then no-ball, then the seven classes.
//!   2. Four only: boundary-save roll (skipped when save chance is zero),
//!      then the two-or-three split if saved.
//!   3. Wicket only: dismissal-kind roll.

use crate::{
    config::{DismissalConfig, ProbabilityConfig},
    outcome::{DismissalKind, Outcome},
    player::PlayerSkills,
    probability::{OutcomeClass, OutcomeProbabilities},
    rng::RandomSource,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct OutcomeResolver {
    config: Arc<ProbabilityConfig>,
}

impl OutcomeResolver {
    pub fn new(config: Arc<ProbabilityConfig>) -> Self {
        Self { config }
    }

    pub fn resolve(
        &self,
        probs:         &OutcomeProbabilities,
        bowler:        &PlayerSkills,
        fielding_team: &[PlayerSkills],
        rng:           &mut dyn RandomSource,
    ) -> Outcome {
        let extras = self.config.extras;
        let mut draw = rng.next_f64();

        if draw < extras.wide_chance {
            return Outcome::wide();
        }
        draw -= extras.wide_chance;

        if draw < extras.noball_chance {
            return Outcome::no_ball();
        }
        draw -= extras.noball_chance;

        // Rescale into the mass left after extras.
        let remaining = 1.0 - extras.wide_chance - extras.noball_chance;
        let draw = if remaining > 0.0 { draw / remaining } else { draw };

        match sample_class(probs, draw) {
            OutcomeClass::Dot    => Outcome::DOT,
            OutcomeClass::Single => Outcome::runs(1),
            OutcomeClass::Two    => Outcome::runs(2),
            OutcomeClass::Three  => Outcome::runs(3),
            OutcomeClass::Four   => self.resolve_four(fielding_team, rng),
            OutcomeClass::Six    => Outcome::runs(6),
            OutcomeClass::Wicket => Outcome::wicket(self.roll_dismissal(bowler, rng)),
        }
    }

    /// Chance that the fielding side cuts a four off, in [0, max_chance].
    pub fn boundary_save_chance(&self, fielding_team: &[PlayerSkills]) -> f64 {
        if fielding_team.is_empty() {
            return 0.0;
        }
        let save = self.config.fielding.boundary_save;
        let count = fielding_team.len() as f64;
        let avg_athleticism = fielding_team.iter().map(|p| p.fielding.athleticism as f64).sum::<f64>() / count;
        let avg_ground = fielding_team.iter().map(|p| p.fielding.ground as f64).sum::<f64>() / count;

        let chance = (avg_athleticism - save.baseline) / save.athleticism_divisor
            + (avg_ground - save.baseline) / save.ground_divisor;
        chance.clamp(0.0, save.max_chance)
    }

    fn resolve_four(&self, fielding_team: &[PlayerSkills], rng: &mut dyn RandomSource) -> Outcome {
        let chance = self.boundary_save_chance(fielding_team);
        if chance > 0.0 && rng.chance(chance) {
            let two_run_share = self.config.fielding.boundary_save.two_run_share;
            let runs = if rng.chance(two_run_share) { 2 } else { 3 };
            return Outcome::Runs { runs, boundary_saved: true };
        }
        Outcome::runs(4)
    }

    fn roll_dismissal(&self, bowler: &PlayerSkills, rng: &mut dyn RandomSource) -> DismissalKind {
        let table = dismissal_table(&self.config.dismissals, bowler);
        let draw = rng.next_f64();
        let mut cumulative = 0.0;
        for (kind, weight) in table {
            cumulative += weight;
            if draw < cumulative {
                return *kind;
            }
        }
        DismissalKind::Caught
    }
}

fn dismissal_table<'a>(config: &'a DismissalConfig, bowler: &PlayerSkills) -> &'a [(DismissalKind, f64)] {
    if bowler.is_spinner() {
        &config.spin
    } else {
        &config.pace
    }
}

/// Inverse-CDF walk in OutcomeClass::ALL order; dot if rounding leaves
/// the draw past the last class.
pub fn sample_class(probs: &OutcomeProbabilities, draw: f64) -> OutcomeClass {
    let mut cumulative = 0.0;
    for class in OutcomeClass::ALL {
        cumulative += probs.get(class);
        if draw < cumulative {
            return class;
        }
    }
    OutcomeClass::Dot
}
