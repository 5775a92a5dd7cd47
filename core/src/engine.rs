//! The match engine - drives the model and resolver ball by ball.
//!
//! EXECUTION ORDER per delivery (fixed, documented, never reordered):
//!   1. Assemble SimulationContext from the current state
//!   2. ProbabilityModel::calculate_probabilities
//!   3. OutcomeResolver::resolve (all draws from the caller's RandomSource)
//!   4. Optional commentary line
//!   5. InningsState::apply_delivery
//!
//! RULES:
//!   - The engine holds only immutable configuration; it is Send + Sync.
//!   - simulate_ball never mutates the caller's state.
//!   - simulate_over / replay_over consume the state they are given and
//!     return the advanced copy.
//!   - A completed innings rejects every further request.

use crate::{
    config::ProbabilityConfig,
    context::{batsman_state, momentum, pressure_level, BatsmanState, Momentum, PressureLevel, SimulationContext},
    error::{SimError, SimResult},
    innings::{BallEvent, InningsState, OverSummary},
    narrative,
    outcome::Outcome,
    player::{find_player, PlayerSkills},
    probability::{OutcomeProbabilities, ProbabilityModel},
    resolver::OutcomeResolver,
    rng::RandomSource,
    selection::{check_eligibility, recommend_bowler, BowlerRecommendation},
    tactics::{BattingTactics, BowlingTactics, PitchConditions},
    types::{PlayerId, BALLS_PER_OVER, MAX_WICKETS, TOTAL_OVERS},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Deliveries after which an over that has still not produced six legal
/// balls is treated as a broken random source.
pub const MAX_DELIVERIES_PER_OVER: usize = 60;

// ── Requests and results ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BallRequest<'a> {
    pub state:           &'a InningsState,
    pub striker:         &'a PlayerSkills,
    pub bowler:          &'a PlayerSkills,
    pub fielding_team:   &'a [PlayerSkills],
    pub batting_tactics: BattingTactics,
    pub bowling_tactics: BowlingTactics,
    pub pitch:           PitchConditions,
    pub target:          Option<u32>,
    pub include_narrative: bool,
}

#[derive(Debug, Clone)]
pub struct OverRequest<'a> {
    pub state:           InningsState,
    pub batting_team:    &'a [PlayerSkills],
    pub bowling_team:    &'a [PlayerSkills],
    pub bowler_id:       &'a str,
    pub batting_tactics: BattingTactics,
    pub bowling_tactics: BowlingTactics,
    pub pitch:           PitchConditions,
    pub target:          Option<u32>,
    pub include_narrative: bool,
}

/// Where the innings would stand after one simulated ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallProjection {
    pub runs:               u32,
    pub wickets:            u32,
    pub overs:              u32,
    pub balls:              u32,
    pub current_batters:    [PlayerId; 2],
    pub striker_changed:    bool,
    pub innings_complete:   bool,
    pub new_batsman_needed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextUpdates {
    pub batsman_state:  BatsmanState,
    pub pressure_level: PressureLevel,
    pub momentum:       Momentum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallResult {
    pub outcome:         Outcome,
    pub narrative:       Option<String>,
    /// Only populated when commentary was requested.
    pub probabilities:   Option<OutcomeProbabilities>,
    pub projection:      BallProjection,
    pub context_updates: ContextUpdates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverResult {
    pub summary:          OverSummary,
    pub state:            InningsState,
    pub over_complete:    bool,
    pub innings_complete: bool,
    pub narratives:       Vec<String>,
    pub recommended_next_bowler: Option<BowlerRecommendation>,
}

// ── Engine ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MatchEngine {
    config:   Arc<ProbabilityConfig>,
    model:    ProbabilityModel,
    resolver: OutcomeResolver,
}

impl MatchEngine {
    pub fn new(config: Arc<ProbabilityConfig>) -> Self {
        Self {
            model:    ProbabilityModel::new(Arc::clone(&config)),
            resolver: OutcomeResolver::new(Arc::clone(&config)),
            config,
        }
    }

    /// Engine over the process-wide standard table.
    pub fn standard() -> Self {
        Self::new(ProbabilityConfig::shared_standard())
    }

    /// Engine over `{data_dir}/probability_params.json`.
    pub fn load(data_dir: &str) -> SimResult<Self> {
        Ok(Self::new(Arc::new(ProbabilityConfig::load(data_dir)?)))
    }

    pub fn config(&self) -> &ProbabilityConfig {
        &self.config
    }

    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }

    pub fn resolver(&self) -> &OutcomeResolver {
        &self.resolver
    }

    /// Resolve one delivery against a borrowed state and report what it
    /// would do, without applying it.
    pub fn simulate_ball(&self, req: &BallRequest<'_>, rng: &mut dyn RandomSource) -> SimResult<BallResult> {
        let state = req.state;
        if state.is_complete(req.target) {
            return Err(SimError::InningsComplete);
        }
        state.validate()?;
        req.striker.validate()?;
        req.bowler.validate()?;
        if req.striker.id != *state.striker() {
            return Err(SimError::StrikerMismatch {
                expected: state.striker().clone(),
                actual:   req.striker.id.clone(),
            });
        }

        let ctx = SimulationContext::assemble(
            state,
            req.striker,
            req.bowler,
            &req.batting_tactics,
            &req.bowling_tactics,
            req.pitch,
            req.target,
        );
        let probs = self.model.calculate_probabilities(&ctx);
        let outcome = self.resolver.resolve(&probs, req.bowler, req.fielding_team, rng);
        log::debug!("ball {}.{}: {} to {} -> {outcome:?}", state.overs, state.balls + 1, req.bowler.id, req.striker.id);

        let narrative = req.include_narrative.then(|| {
            let event = state.next_ball_event(&req.bowler.id, outcome);
            narrative::describe(&event, req.striker, req.bowler)
        });

        let projection = project_ball(state, outcome, req.target);
        let faced = ctx.balls_faced + outcome.is_legal() as u32;
        let context_updates = ContextUpdates {
            batsman_state:  batsman_state(faced, &self.config.batsman_state.thresholds),
            pressure_level: pressure_level(state, req.target),
            momentum:       momentum(&state.over_summaries),
        };

        Ok(BallResult {
            outcome,
            probabilities: req.include_narrative.then_some(probs),
            narrative,
            projection,
            context_updates,
        })
    }

    /// Bowl deliveries until six legal balls are complete or the innings
    /// ends. A partially bowled over resumes from `state.balls`.
    pub fn simulate_over(&self, req: OverRequest<'_>, rng: &mut dyn RandomSource) -> SimResult<OverResult> {
        self.run_over(req, |engine, state, striker, bowler, fielders, req| {
            let ctx = SimulationContext::assemble(
                state,
                striker,
                bowler,
                &req.batting_tactics,
                &req.bowling_tactics,
                req.pitch,
                req.target,
            );
            let probs = engine.model.calculate_probabilities(&ctx);
            Some(engine.resolver.resolve(&probs, bowler, fielders, &mut *rng))
        })
    }

    /// Push a fixed outcome sequence through the same state machine.
    /// Stops when the over or innings completes; if the outcomes run out
    /// first the over is left partial.
    pub fn replay_over(&self, req: OverRequest<'_>, outcomes: &[Outcome]) -> SimResult<OverResult> {
        let mut outcomes = outcomes.iter().copied();
        self.run_over(req, |_, _, _, _, _, _| outcomes.next())
    }

    fn run_over<F>(&self, req: OverRequest<'_>, mut next_outcome: F) -> SimResult<OverResult>
    where
        F: FnMut(&Self, &InningsState, &PlayerSkills, &PlayerSkills, &[PlayerSkills], &OverRequest<'_>) -> Option<Outcome>,
    {
        if req.state.is_complete(req.target) {
            return Err(SimError::InningsComplete);
        }
        req.state.validate()?;

        let bowler = find_player(req.bowling_team, req.bowler_id)
            .ok_or_else(|| SimError::UnknownBowler { player_id: req.bowler_id.to_string() })?;
        bowler.validate()?;
        check_eligibility(&req.state, bowler, &self.config.rules)?;

        let mut state = req.state.clone();
        state.current_bowler = Some(bowler.id.clone());

        let over_number = state.overs;
        let (start_runs, start_wickets) = (state.runs, state.wickets);
        let mut events: Vec<BallEvent> = Vec::new();
        let mut narratives = Vec::new();
        let mut over_complete = false;

        while !state.innings_complete {
            if events.len() >= MAX_DELIVERIES_PER_OVER {
                return Err(SimError::InvalidState {
                    reason: format!("over {} not complete after {MAX_DELIVERIES_PER_OVER} deliveries", over_number + 1),
                });
            }

            let striker = find_player(req.batting_team, state.striker())
                .ok_or_else(|| SimError::UnknownStriker { player_id: state.striker().clone() })?;
            striker.validate()?;

            let Some(outcome) = next_outcome(self, &state, striker, bowler, req.bowling_team, &req) else {
                break;
            };

            let mut event = state.next_ball_event(&bowler.id, outcome);
            if req.include_narrative {
                event.narrative = narrative::describe(&event, striker, bowler);
                narratives.push(event.narrative.clone());
            }
            log::debug!("ball {}.{}: {} to {} -> {outcome:?}", event.over, event.ball, bowler.id, striker.id);

            let effect = state.apply_delivery(&event, req.batting_team, req.target);
            events.push(event);

            if effect.over_complete {
                over_complete = true;
                break;
            }
        }

        let summary = OverSummary {
            over_number,
            bowler:  bowler.id.clone(),
            runs:    state.runs - start_runs,
            wickets: state.wickets - start_wickets,
            balls:   events,
        };
        if over_complete || state.innings_complete {
            state.over_summaries.push(summary.clone());
        }

        log::debug!(
            "over {} ({}): {} runs, {} wickets, score {}/{}",
            over_number + 1, bowler.id, summary.runs, summary.wickets, state.runs, state.wickets
        );
        if state.innings_complete {
            log::info!(
                "innings complete: {} {}/{} in {}.{} overs",
                state.batting_team, state.runs, state.wickets, state.overs, state.balls
            );
        }

        let recommended_next_bowler = if over_complete && !state.innings_complete {
            recommend_bowler(&state, req.bowling_team, &self.config.rules)
                .map(|shortlist| shortlist.best)
                .ok()
        } else {
            None
        };

        Ok(OverResult {
            summary,
            innings_complete: state.innings_complete,
            over_complete,
            narratives,
            recommended_next_bowler,
            state,
        })
    }
}

/// Apply one outcome to a copy of the score without a batting roster.
/// A wicket leaves the dismissed striker in place and flags that a new
/// batter is needed.
pub fn project_ball(state: &InningsState, outcome: Outcome, target: Option<u32>) -> BallProjection {
    let runs = state.runs + outcome.team_runs();
    let mut wickets = state.wickets;
    let mut overs = state.overs;
    let mut balls = state.balls;
    let mut pair = state.current_batters.clone();
    let mut striker_changed = false;
    let mut new_batsman_needed = false;

    match outcome {
        Outcome::Wicket { .. } => {
            wickets += 1;
            new_batsman_needed = wickets < MAX_WICKETS;
        }
        Outcome::Runs { runs: scored, .. } if scored % 2 == 1 => {
            pair.swap(0, 1);
            striker_changed = true;
        }
        _ => {}
    }

    if outcome.is_legal() {
        balls += 1;
        if balls == BALLS_PER_OVER {
            balls = 0;
            overs += 1;
            pair.swap(0, 1);
            striker_changed = !striker_changed;
        }
    }

    let innings_complete = wickets >= MAX_WICKETS
        || overs >= TOTAL_OVERS
        || target.is_some_and(|t| runs >= t);
    if innings_complete {
        new_batsman_needed = false;
    }

    BallProjection {
        runs,
        wickets,
        overs,
        balls,
        current_batters: pair,
        striker_changed,
        innings_complete,
        new_batsman_needed,
    }
}
