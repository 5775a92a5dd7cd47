//! Innings state and the per-delivery state transitions.
//!
//! RULE: Only `apply_delivery` mutates scoring state. The engine resolves
//! an outcome, wraps it in a BallEvent, and hands it here; replay and
//! live simulation share this single path.
//!
//! TRANSITION ORDER within one delivery:
//!   1. Outcome-specific scoring (wicket, extra or runs)
//!   2. Odd-run strike swap (runs only)
//!   3. Bowler figures (legal deliveries only)
//!   4. Legal ball count; sixth legal ball closes the over and rotates
//!      strike again
//!   5. Completion checks: target, ten wickets, twenty overs

use crate::{
    error::{SimError, SimResult},
    outcome::Outcome,
    player::PlayerSkills,
    types::{PlayerId, TeamId, BALLS_PER_OVER, INNINGS_BALLS, MAX_WICKETS, TOTAL_OVERS},
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Legal deliveries kept for momentum.
pub const RECENT_BALLS_WINDOW: usize = 6;

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatterFigures {
    pub runs:  u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
}

impl BatterFigures {
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            0.0
        } else {
            self.runs as f64 * 100.0 / self.balls as f64
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlerFigures {
    pub overs:   u32,
    pub runs:    u32,
    pub wickets: u32,
    pub dots:    u32,
}

impl BowlerFigures {
    /// Runs per completed over; None before the first over is finished.
    pub fn economy(&self) -> Option<f64> {
        (self.overs > 0).then(|| self.runs as f64 / self.overs as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub player: PlayerId,
    /// Team score when the wicket fell.
    pub runs:   u32,
    /// Over.ball notation, e.g. 14.3 for the third ball of the fifteenth over.
    pub overs:  f64,
}

impl FallOfWicket {
    /// 1-based legal ball of the innings on which the wicket fell.
    pub fn legal_ball(&self) -> u32 {
        let over = self.overs.trunc();
        let ball = ((self.overs - over) * 10.0).round();
        (over as u32) * BALLS_PER_OVER + ball as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallEvent {
    /// 0-based over number.
    pub over:    u32,
    /// 1-based legal ball this delivery was bowled as. Extras repeat the
    /// number of the legal ball that follows them.
    pub ball:    u32,
    pub batter:  PlayerId,
    pub bowler:  PlayerId,
    pub outcome: Outcome,
    #[serde(default)]
    pub narrative: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverSummary {
    pub over_number: u32,
    pub bowler:      PlayerId,
    pub runs:        u32,
    pub wickets:     u32,
    pub balls:       Vec<BallEvent>,
}

impl OverSummary {
    pub fn is_maiden(&self) -> bool {
        self.runs == 0 && self.balls.iter().filter(|b| b.outcome.is_legal()).count() == BALLS_PER_OVER as usize
    }
}

/// What one delivery did to the innings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryEffect {
    pub legal:            bool,
    pub striker_changed:  bool,
    pub wicket:           bool,
    pub new_batter_in:    bool,
    pub over_complete:    bool,
    pub innings_complete: bool,
}

// ── State ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsState {
    pub batting_team: TeamId,
    pub bowling_team: TeamId,
    #[serde(default)]
    pub runs:    u32,
    #[serde(default)]
    pub wickets: u32,
    /// Complete overs.
    #[serde(default)]
    pub overs:   u32,
    /// Legal balls in the current over, 0–5.
    #[serde(default)]
    pub balls:   u32,
    /// [striker, non_striker].
    pub current_batters: [PlayerId; 2],
    #[serde(default)]
    pub current_bowler: Option<PlayerId>,
    #[serde(default)]
    pub over_summaries:  Vec<OverSummary>,
    #[serde(default)]
    pub fall_of_wickets: Vec<FallOfWicket>,
    #[serde(default)]
    pub batter_stats: HashMap<PlayerId, BatterFigures>,
    #[serde(default)]
    pub bowler_stats: HashMap<PlayerId, BowlerFigures>,
    /// Last six legal deliveries, oldest first.
    #[serde(default)]
    pub recent_balls: VecDeque<BallEvent>,
    #[serde(default)]
    pub innings_complete: bool,
}

impl InningsState {
    pub fn new(
        batting_team: impl Into<TeamId>,
        bowling_team: impl Into<TeamId>,
        striker:      impl Into<PlayerId>,
        non_striker:  impl Into<PlayerId>,
    ) -> Self {
        Self {
            batting_team:     batting_team.into(),
            bowling_team:     bowling_team.into(),
            runs:             0,
            wickets:          0,
            overs:            0,
            balls:            0,
            current_batters:  [striker.into(), non_striker.into()],
            current_bowler:   None,
            over_summaries:   Vec::new(),
            fall_of_wickets:  Vec::new(),
            batter_stats:     HashMap::new(),
            bowler_stats:     HashMap::new(),
            recent_balls:     VecDeque::new(),
            innings_complete: false,
        }
    }

    pub fn striker(&self) -> &PlayerId {
        &self.current_batters[0]
    }

    pub fn non_striker(&self) -> &PlayerId {
        &self.current_batters[1]
    }

    pub fn legal_balls_bowled(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls
    }

    pub fn balls_remaining(&self) -> u32 {
        INNINGS_BALLS.saturating_sub(self.legal_balls_bowled())
    }

    /// Conventional over.ball notation, e.g. 12.4.
    pub fn overs_notation(&self) -> f64 {
        self.overs as f64 + self.balls as f64 / 10.0
    }

    pub fn batter(&self, id: &str) -> Option<&BatterFigures> {
        self.batter_stats.get(id)
    }

    pub fn bowler(&self, id: &str) -> Option<&BowlerFigures> {
        self.bowler_stats.get(id)
    }

    pub fn is_dismissed(&self, id: &str) -> bool {
        self.fall_of_wickets.iter().any(|fow| fow.player == id)
    }

    /// Runs since the last wicket fell.
    pub fn partnership_runs(&self) -> u32 {
        let at_last_wicket = self.fall_of_wickets.last().map_or(0, |fow| fow.runs);
        self.runs.saturating_sub(at_last_wicket)
    }

    /// (runs, boundaries, dots) over the trailing legal-ball window.
    pub fn recent_scoring(&self) -> (u32, u32, u32) {
        self.recent_balls.iter().fold((0, 0, 0), |(runs, fours_sixes, dots), ball| {
            (
                runs + ball.outcome.team_runs(),
                fours_sixes + ball.outcome.is_boundary() as u32,
                dots + ball.outcome.is_dot() as u32,
            )
        })
    }

    /// True when the flag is set or the score itself says the innings is
    /// over: ten wickets, twenty overs, or the target reached.
    pub fn is_complete(&self, target: Option<u32>) -> bool {
        self.innings_complete
            || self.wickets >= MAX_WICKETS
            || self.overs >= TOTAL_OVERS
            || target.is_some_and(|t| self.runs >= t)
    }

    pub fn last_bowler(&self) -> Option<&PlayerId> {
        self.over_summaries.last().map(|o| &o.bowler)
    }

    /// First roster player who is neither at the crease nor dismissed.
    pub fn next_batter<'a>(&self, roster: &'a [PlayerSkills]) -> Option<&'a PlayerSkills> {
        roster
            .iter()
            .find(|p| !self.current_batters.contains(&p.id) && !self.is_dismissed(&p.id))
    }

    /// Reject states that break the innings invariants.
    pub fn validate(&self) -> SimResult<()> {
        if self.wickets > MAX_WICKETS {
            return Err(invalid_state(format!("wickets={} exceeds {MAX_WICKETS}", self.wickets)));
        }
        if self.balls >= BALLS_PER_OVER {
            return Err(invalid_state(format!("balls={} outside 0..{BALLS_PER_OVER}", self.balls)));
        }
        if self.overs > TOTAL_OVERS || (self.overs == TOTAL_OVERS && self.balls > 0) {
            return Err(invalid_state(format!("overs={}.{} exceeds {TOTAL_OVERS}", self.overs, self.balls)));
        }
        if self.current_batters[0] == self.current_batters[1] {
            return Err(invalid_state(format!("striker and non-striker are both '{}'", self.striker())));
        }
        if !self.innings_complete {
            if let Some(out) = self.current_batters.iter().find(|id| self.is_dismissed(id)) {
                return Err(invalid_state(format!("batter '{out}' at the crease is already dismissed")));
            }
        }
        Ok(())
    }

    /// The event for the next delivery, before it is applied.
    pub fn next_ball_event(&self, bowler: &str, outcome: Outcome) -> BallEvent {
        BallEvent {
            over:      self.overs,
            ball:      self.balls + 1,
            batter:    self.striker().clone(),
            bowler:    bowler.to_string(),
            outcome,
            narrative: String::new(),
        }
    }

    /// Apply one delivery. The event's batter must be the current striker.
    pub fn apply_delivery(
        &mut self,
        event:          &BallEvent,
        batting_roster: &[PlayerSkills],
        target:         Option<u32>,
    ) -> DeliveryEffect {
        let mut effect = DeliveryEffect { legal: event.outcome.is_legal(), ..Default::default() };
        let striker = self.striker().clone();

        match event.outcome {
            Outcome::Wicket { runs_before_dismissal, .. } => {
                effect.wicket = true;
                self.wickets += 1;
                self.runs += runs_before_dismissal;

                let figures = self.batter_stats.entry(striker.clone()).or_default();
                figures.runs += runs_before_dismissal;
                figures.balls += 1;

                self.fall_of_wickets.push(FallOfWicket {
                    player: striker,
                    runs:   self.runs,
                    overs:  self.overs as f64 + (self.balls + 1) as f64 / 10.0,
                });

                let bowler = self.bowler_stats.entry(event.bowler.clone()).or_default();
                bowler.runs += runs_before_dismissal;
                bowler.wickets += 1;

                let replacement = self.next_batter(batting_roster).map(|p| p.id.clone());
                match replacement {
                    Some(next) if self.wickets < MAX_WICKETS => {
                        self.current_batters[0] = next;
                        effect.new_batter_in = true;
                    }
                    _ => self.innings_complete = true,
                }
            }
            Outcome::Extra { runs, .. } => {
                self.runs += runs;
            }
            Outcome::Runs { runs, .. } => {
                self.runs += runs;

                let figures = self.batter_stats.entry(striker).or_default();
                figures.runs += runs;
                figures.balls += 1;
                match runs {
                    4 => figures.fours += 1,
                    6 => figures.sixes += 1,
                    _ => {}
                }

                let bowler = self.bowler_stats.entry(event.bowler.clone()).or_default();
                bowler.runs += runs;
                if runs == 0 {
                    bowler.dots += 1;
                }

                if runs % 2 == 1 {
                    self.swap_strike();
                    effect.striker_changed = true;
                }
            }
        }

        if effect.legal {
            self.recent_balls.push_back(event.clone());
            while self.recent_balls.len() > RECENT_BALLS_WINDOW {
                self.recent_balls.pop_front();
            }

            self.balls += 1;
            if self.balls == BALLS_PER_OVER {
                self.balls = 0;
                self.overs += 1;
                self.swap_strike();
                effect.striker_changed = !effect.striker_changed;
                self.bowler_stats.entry(event.bowler.clone()).or_default().overs += 1;
                effect.over_complete = true;
            }
        }

        if self.is_complete(target) {
            self.innings_complete = true;
        }
        effect.innings_complete = self.innings_complete;
        effect
    }

    pub fn swap_strike(&mut self) {
        self.current_batters.swap(0, 1);
    }
}

fn invalid_state(reason: String) -> SimError {
    SimError::InvalidState { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fall_of_wicket_notation_maps_to_legal_ball() {
        let fow = FallOfWicket { player: "p".into(), runs: 40, overs: 14.3 };
        assert_eq!(fow.legal_ball(), 87);
        let last_ball = FallOfWicket { player: "p".into(), runs: 40, overs: 2.6 };
        assert_eq!(last_ball.legal_ball(), 18);
    }

    #[test]
    fn validate_rejects_broken_bookkeeping() {
        let mut state = InningsState::new("bat", "bowl", "a", "b");
        state.validate().unwrap();

        state.balls = 6;
        assert!(matches!(state.validate(), Err(SimError::InvalidState { .. })));

        state.balls = 0;
        state.current_batters = ["a".into(), "a".into()];
        assert!(matches!(state.validate(), Err(SimError::InvalidState { .. })));
    }

    #[test]
    fn maiden_needs_six_scoreless_legal_balls() {
        let state = InningsState::new("bat", "bowl", "a", "b");
        let dot = state.next_ball_event("x", Outcome::DOT);
        let mut over = OverSummary { over_number: 0, bowler: "x".into(), runs: 0, wickets: 0, balls: vec![dot; 5] };
        assert!(!over.is_maiden(), "five balls is not an over");

        over.balls.push(state.next_ball_event("x", Outcome::wicket(crate::outcome::DismissalKind::Bowled)));
        assert!(over.is_maiden(), "a wicket maiden is still a maiden");

        over.runs = 1;
        assert!(!over.is_maiden());
    }

    #[test]
    fn completion_follows_the_score() {
        let mut state = InningsState::new("bat", "bowl", "a", "b");
        assert!(!state.is_complete(Some(150)));
        state.runs = 150;
        assert!(state.is_complete(Some(150)));
        assert!(!state.is_complete(None));
        state.overs = TOTAL_OVERS;
        assert!(state.is_complete(None));
        assert_eq!(state.overs_notation(), 20.0);
    }

    #[test]
    fn economy_needs_a_completed_over() {
        let mut figures = BowlerFigures::default();
        assert_eq!(figures.economy(), None);
        figures.overs = 2;
        figures.runs = 15;
        assert_eq!(figures.economy(), Some(7.5));
    }
}
