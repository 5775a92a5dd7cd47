use cricket_core::{
    config::BatsmanThresholds,
    context::{
        batsman_state, momentum, phase_from_overs, pressure_level, BatsmanState, MatchPhase, Momentum,
        PressureLevel, SimulationContext,
    },
    innings::{FallOfWicket, InningsState, OverSummary},
    player::{BattingSkills, BowlingSkills, FieldingSkills, PlayerRole, PlayerSkills},
    tactics::{BattingTactics, BowlingLength, BowlingTactics, FieldSetting, PitchConditions, TacticalApproach},
};

fn player(id: &str) -> PlayerSkills {
    PlayerSkills {
        id:            id.to_string(),
        name:          format!("Player {id}"),
        short_name:    id.to_string(),
        role:          PlayerRole::Allrounder,
        bowling_style: None,
        batting:  BattingSkills { technique: 55, power: 55, timing: 55, temperament: 55 },
        bowling:  BowlingSkills { speed: 55, accuracy: 55, variation: 55, stamina: 55 },
        fielding: FieldingSkills { catching: 50, ground: 50, throwing: 50, athleticism: 50 },
        form:    0,
        fitness: 90,
        morale:  70,
        fatigue: 10,
    }
}

fn over(number: u32, runs: u32, wickets: u32) -> OverSummary {
    OverSummary { over_number: number, bowler: "x".into(), runs, wickets, balls: Vec::new() }
}

fn state_at(overs: u32, balls: u32, runs: u32) -> InningsState {
    let mut state = InningsState::new("bat", "bowl", "s", "n");
    state.overs = overs;
    state.balls = balls;
    state.runs = runs;
    state
}

#[test]
fn phase_boundaries_fall_into_the_later_phase() {
    assert_eq!(phase_from_overs(0.0), MatchPhase::Powerplay);
    assert_eq!(phase_from_overs(5.99), MatchPhase::Powerplay);
    assert_eq!(phase_from_overs(6.0), MatchPhase::Middle);
    assert_eq!(phase_from_overs(15.99), MatchPhase::Middle);
    assert_eq!(phase_from_overs(16.0), MatchPhase::Death);
    assert_eq!(phase_from_overs(19.5), MatchPhase::Death);
}

#[test]
fn batsman_state_default_thresholds() {
    let thresholds = BatsmanThresholds::default();
    assert_eq!(batsman_state(0, &thresholds), BatsmanState::New);
    assert_eq!(batsman_state(5, &thresholds), BatsmanState::New);
    assert_eq!(batsman_state(6, &thresholds), BatsmanState::Settling);
    assert_eq!(batsman_state(14, &thresholds), BatsmanState::Settling);
    assert_eq!(batsman_state(15, &thresholds), BatsmanState::Set);
}

#[test]
fn pressure_follows_the_required_rate() {
    let state = state_at(15, 0, 120);

    assert_eq!(pressure_level(&state, None), PressureLevel::Low);
    // 30 balls left.
    assert_eq!(pressure_level(&state, Some(160)), PressureLevel::Low, "8 an over");
    assert_eq!(pressure_level(&state, Some(175)), PressureLevel::Medium, "11 an over");
    assert_eq!(pressure_level(&state, Some(171)), PressureLevel::Medium, "10.2 an over");
    assert_eq!(pressure_level(&state, Some(181)), PressureLevel::High, "12.2 an over");

    let finished = state_at(20, 0, 150);
    assert_eq!(pressure_level(&finished, Some(200)), PressureLevel::High, "no balls left");
}

#[test]
fn momentum_reads_the_last_two_overs() {
    assert_eq!(momentum(&[]), Momentum::Neutral);
    assert_eq!(momentum(&[over(0, 30, 0)]), Momentum::Neutral, "one over is not enough");

    assert_eq!(momentum(&[over(0, 2, 0), over(1, 12, 0), over(2, 8, 0)]), Momentum::Batting);
    assert_eq!(momentum(&[over(0, 25, 0), over(1, 10, 1), over(2, 9, 0)]), Momentum::Neutral);
    assert_eq!(momentum(&[over(0, 4, 0), over(1, 15, 1), over(2, 10, 1)]), Momentum::Bowling, "wickets win over runs");
}

#[test]
fn recent_wickets_cover_the_last_three_overs() {
    let striker = player("s");
    let bowler = player("b");
    let batting = BattingTactics::new(TacticalApproach::Balanced);
    let bowling = BowlingTactics::new(BowlingLength::GoodLength, FieldSetting::Balanced);

    let mut state = state_at(5, 2, 40);
    state.wickets = 1;
    // Third ball of the third over: legal ball 15.
    state.fall_of_wickets.push(FallOfWicket { player: "gone".into(), runs: 22, overs: 2.3 });

    let ctx = SimulationContext::assemble(&state, &striker, &bowler, &batting, &bowling, PitchConditions::default(), None);
    assert_eq!(ctx.legal_balls_bowled, 32);
    assert_eq!(ctx.recent_wickets, 1);
    assert_eq!(ctx.partnership_runs, 18);
    assert_eq!(ctx.phase, MatchPhase::Powerplay);

    state.balls = 3;
    let ctx = SimulationContext::assemble(&state, &striker, &bowler, &batting, &bowling, PitchConditions::default(), None);
    assert_eq!(ctx.recent_wickets, 0, "eighteen legal balls later the wicket has aged out");
}

#[test]
fn context_reads_striker_and_bowler_figures() {
    let striker = player("s");
    let bowler = player("b");
    let mut state = state_at(16, 0, 130);
    state.batter_stats.entry("s".into()).or_default().balls = 9;
    state.bowler_stats.entry("b".into()).or_default().wickets = 2;

    let ctx = SimulationContext::assemble(
        &state,
        &striker,
        &bowler,
        &BattingTactics::new(TacticalApproach::Aggressive),
        &BowlingTactics::new(BowlingLength::Yorkers, FieldSetting::DeathField),
        PitchConditions::default(),
        Some(190),
    );
    assert_eq!(ctx.balls_faced, 9);
    assert_eq!(ctx.bowler_wickets, 2);
    assert_eq!(ctx.phase, MatchPhase::Death);
    assert_eq!(ctx.balls_remaining(), 24);
    assert_eq!(ctx.batting_approach, TacticalApproach::Aggressive);
}
