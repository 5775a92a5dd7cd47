//! Bowler eligibility and next-over recommendation.

use crate::{
    config::BowlingRules,
    context::{phase_from_overs, MatchPhase},
    error::{SimError, SimResult},
    innings::InningsState,
    player::PlayerSkills,
    types::PlayerId,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const BASE_SCORE: f64 = 50.0;
const MAX_ALTERNATIVES: usize = 3;
/// Partnership size at which a change of bowler is worth calling out.
const PARTNERSHIP_THREAT_RUNS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerRecommendation {
    pub bowler_id: PlayerId,
    pub name:      String,
    pub score:     f64,
    pub reasons:   Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerShortlist {
    pub best:         BowlerRecommendation,
    pub alternatives: Vec<BowlerRecommendation>,
}

/// Whether `bowler` may bowl the next delivery. The consecutive-over rule
/// only applies when a fresh over is about to start.
pub fn check_eligibility(state: &InningsState, bowler: &PlayerSkills, rules: &BowlingRules) -> SimResult<()> {
    let overs_bowled = state.bowler(&bowler.id).map_or(0, |f| f.overs);
    if overs_bowled >= rules.max_overs_per_bowler {
        return Err(SimError::BowlerIneligible {
            player_id: bowler.id.clone(),
            reason:    format!("already bowled {overs_bowled} of {} overs", rules.max_overs_per_bowler),
        });
    }
    if state.balls == 0 && state.last_bowler() == Some(&bowler.id) {
        return Err(SimError::BowlerIneligible {
            player_id: bowler.id.clone(),
            reason:    "bowled the previous over".to_string(),
        });
    }
    Ok(())
}

/// Bowling-role players who may take the next over.
pub fn eligible_bowlers<'a>(
    state: &InningsState,
    team:  &'a [PlayerSkills],
    rules: &BowlingRules,
) -> Vec<&'a PlayerSkills> {
    team.iter()
        .filter(|p| p.role.bowls())
        .filter(|p| check_eligibility(state, p, rules).is_ok())
        .collect()
}

/// Rank eligible bowlers for the over that starts at `state.overs`.
pub fn recommend_bowler(
    state: &InningsState,
    team:  &[PlayerSkills],
    rules: &BowlingRules,
) -> SimResult<BowlerShortlist> {
    let phase = phase_from_overs(state.overs as f64);

    let mut ranked: Vec<BowlerRecommendation> = eligible_bowlers(state, team, rules)
        .into_iter()
        .map(|bowler| score_bowler(state, bowler, phase))
        .collect();
    ranked.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.bowler_id.cmp(&b.bowler_id),
        other => other,
    });

    let mut ranked = ranked.into_iter();
    let best = ranked.next().ok_or(SimError::NoEligibleBowler)?;
    let alternatives = ranked.take(MAX_ALTERNATIVES).collect();

    log::debug!("recommend_bowler: over {} phase {phase:?} best {} ({:.1})", state.overs + 1, best.bowler_id, best.score);
    Ok(BowlerShortlist { best, alternatives })
}

fn score_bowler(state: &InningsState, bowler: &PlayerSkills, phase: MatchPhase) -> BowlerRecommendation {
    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();
    let spinner = bowler.is_spinner();
    let quick = bowler.is_fast_bowler();

    match phase {
        MatchPhase::Powerplay if quick => {
            score += 20.0;
            reasons.push("pace suits the powerplay".to_string());
        }
        MatchPhase::Middle if spinner => {
            score += 20.0;
            reasons.push("spin to control the middle overs".to_string());
        }
        MatchPhase::Death if quick => {
            score += 25.0;
            reasons.push("pace at the death".to_string());
        }
        _ => {}
    }

    if let Some(figures) = state.bowler(&bowler.id) {
        if figures.wickets > 0 {
            score += figures.wickets as f64 * 10.0;
            reasons.push(format!("{} wicket(s) this innings", figures.wickets));
        }
        match figures.economy() {
            Some(econ) if econ < 6.0 => {
                score += 15.0;
                reasons.push(format!("economical at {econ:.1} an over"));
            }
            Some(econ) if econ > 10.0 => {
                score -= 15.0;
                reasons.push(format!("expensive at {econ:.1} an over"));
            }
            _ => {}
        }
    }

    score += (bowler.bowling.weighted() - 55.0) * 0.3;
    score += bowler.form as f64 * 0.5;
    if bowler.form >= 10 {
        reasons.push("in good form".to_string());
    }
    if state.partnership_runs() >= PARTNERSHIP_THREAT_RUNS {
        let kind = if spinner { "spin" } else { "pace" };
        reasons.push(format!("{kind} could break the partnership"));
    }

    BowlerRecommendation {
        bowler_id: bowler.id.clone(),
        name:      bowler.name.clone(),
        score,
        reasons,
    }
}
