//! innings-runner: headless T20 innings simulator.
//!
//! Usage:
//!   innings-runner --seed 12345 --data-dir ./data
//!   innings-runner --seed 12345 --target 171 --json
//!   innings-runner --seed 12345 --ipc-mode

mod squad;

use anyhow::Result;
use chrono::{DateTime, Utc};
use cricket_core::{
    context::{phase_from_overs, MatchPhase},
    engine::{BallRequest, MatchEngine, OverRequest},
    error::{SimError, SimResult},
    innings::{FallOfWicket, InningsState, OverSummary},
    player::{find_player, PlayerSkills},
    rng::{MatchRng, RngBank},
    selection::recommend_bowler,
    tactics::{BattingTactics, BowlingLength, BowlingTactics, FieldSetting, PitchConditions, TacticalApproach},
    types::BALLS_PER_OVER,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    SimulateBall {
        state:           InningsState,
        batting_team:    Vec<PlayerSkills>,
        bowling_team:    Vec<PlayerSkills>,
        bowler_id:       String,
        batting_tactics: BattingTactics,
        bowling_tactics: BowlingTactics,
        #[serde(default)]
        pitch:           PitchConditions,
        #[serde(default)]
        target:          Option<u32>,
        #[serde(default)]
        include_narrative: bool,
    },
    SimulateOver {
        state:           InningsState,
        batting_team:    Vec<PlayerSkills>,
        bowling_team:    Vec<PlayerSkills>,
        bowler_id:       String,
        batting_tactics: BattingTactics,
        bowling_tactics: BowlingTactics,
        #[serde(default)]
        pitch:           PitchConditions,
        #[serde(default)]
        target:          Option<u32>,
        #[serde(default)]
        include_narrative: bool,
    },
    RecommendBowler {
        state:        InningsState,
        bowling_team: Vec<PlayerSkills>,
    },
    Quit,
}

#[derive(Serialize)]
struct BatterLine {
    id:      String,
    name:    String,
    runs:    u32,
    balls:   u32,
    fours:   u32,
    sixes:   u32,
    strike_rate: f64,
    out:     bool,
}

#[derive(Serialize)]
struct BowlerLine {
    id:      String,
    name:    String,
    overs:   String,
    maidens: u32,
    runs:    u32,
    wickets: u32,
    dots:    u32,
    economy: Option<f64>,
}

#[derive(Serialize)]
struct InningsReport {
    run_id:          String,
    generated_at:    DateTime<Utc>,
    seed:            u64,
    target:          Option<u32>,
    batting_team:    String,
    bowling_team:    String,
    runs:            u32,
    wickets:         u32,
    overs:           String,
    extras:          u32,
    batters:         Vec<BatterLine>,
    bowlers:         Vec<BowlerLine>,
    fall_of_wickets: Vec<FallOfWicket>,
    over_by_over:    Vec<OverSummary>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let target = args
        .windows(2)
        .find(|w| w[0] == "--target")
        .and_then(|w| w[1].parse::<u32>().ok());
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json = args.iter().any(|a| a == "--json");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let engine = MatchEngine::load(data_dir)?;

    if ipc_mode {
        return run_ipc_loop(&engine, seed);
    }

    let run_id = uuid::Uuid::new_v4().to_string();
    if !json {
        println!("T20 innings-runner");
        println!("  run_id:    {run_id}");
        println!("  seed:      {seed}");
        println!("  target:    {}", target.map_or("-".to_string(), |t| t.to_string()));
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let bank = RngBank::new(seed);
    let mut setup = bank.for_setup();
    let batting = squad::generate_squad("home", &mut setup);
    let bowling = squad::generate_squad("away", &mut setup);

    let state = play_innings(&engine, &bank, &batting, &bowling, target)?;

    if json {
        let report = build_report(run_id, seed, target, &state, &batting, &bowling);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_scorecard(&state, &batting, &bowling, target);
    }
    Ok(())
}

/// Over by over, taking the recommended bowler each time.
fn play_innings(
    engine:  &MatchEngine,
    bank:    &RngBank,
    batting: &[PlayerSkills],
    bowling: &[PlayerSkills],
    target:  Option<u32>,
) -> SimResult<InningsState> {
    log::info!("simulating innings from seed {}", bank.master_seed());
    let mut state = InningsState::new("home", "away", batting[0].id.clone(), batting[1].id.clone());
    let mut next_bowler = recommend_bowler(&state, bowling, &engine.config().rules)?.best;

    while !state.innings_complete {
        let phase = phase_from_overs(state.overs as f64);
        let (batting_tactics, bowling_tactics) = tactics_for(phase);
        let mut rng = bank.for_over(state.overs);

        let result = engine.simulate_over(
            OverRequest {
                state,
                batting_team: batting,
                bowling_team: bowling,
                bowler_id: &next_bowler.bowler_id,
                batting_tactics,
                bowling_tactics,
                pitch: PitchConditions::default(),
                target,
                include_narrative: false,
            },
            &mut rng,
        )?;
        state = result.state;

        if let Some(recommended) = result.recommended_next_bowler {
            next_bowler = recommended;
        } else if !state.innings_complete {
            return Err(SimError::NoEligibleBowler);
        }
    }
    Ok(state)
}

fn tactics_for(phase: MatchPhase) -> (BattingTactics, BowlingTactics) {
    match phase {
        MatchPhase::Powerplay => (
            BattingTactics::new(TacticalApproach::Aggressive),
            BowlingTactics::new(BowlingLength::GoodLength, FieldSetting::Attacking),
        ),
        MatchPhase::Middle => (
            BattingTactics::new(TacticalApproach::Balanced),
            BowlingTactics::new(BowlingLength::GoodLength, FieldSetting::Balanced),
        ),
        MatchPhase::Death => (
            BattingTactics::new(TacticalApproach::Aggressive),
            BowlingTactics::new(BowlingLength::Yorkers, FieldSetting::DeathField),
        ),
    }
}

fn run_ipc_loop(engine: &MatchEngine, seed: u64) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let bank = RngBank::new(seed);
    let mut ball_rng = MatchRng::seeded(seed).with_name("ipc-ball");

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unrecognised IPC command: {e}");
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::SimulateBall {
                state, batting_team, bowling_team, bowler_id,
                batting_tactics, bowling_tactics, pitch, target, include_narrative,
            } => simulate_ball(
                engine,
                &state,
                &batting_team,
                &bowling_team,
                &bowler_id,
                batting_tactics,
                bowling_tactics,
                pitch,
                target,
                include_narrative,
                &mut ball_rng,
            ),
            IpcCommand::SimulateOver {
                state, batting_team, bowling_team, bowler_id,
                batting_tactics, bowling_tactics, pitch, target, include_narrative,
            } => {
                let mut rng = bank.for_over(state.overs);
                engine
                    .simulate_over(
                        OverRequest {
                            state,
                            batting_team: &batting_team,
                            bowling_team: &bowling_team,
                            bowler_id: &bowler_id,
                            batting_tactics,
                            bowling_tactics,
                            pitch,
                            target,
                            include_narrative,
                        },
                        &mut rng,
                    )
                    .and_then(|result| Ok(serde_json::to_value(result)?))
            }
            IpcCommand::RecommendBowler { state, bowling_team } => {
                recommend_bowler(&state, &bowling_team, &engine.config().rules)
                    .and_then(|shortlist| Ok(serde_json::to_value(shortlist)?))
            }
        };

        match reply {
            Ok(value) => writeln!(stdout, "{value}")?,
            Err(e) => writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?,
        }
        stdout.flush()?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn simulate_ball(
    engine:            &MatchEngine,
    state:             &InningsState,
    batting_team:      &[PlayerSkills],
    bowling_team:      &[PlayerSkills],
    bowler_id:         &str,
    batting_tactics:   BattingTactics,
    bowling_tactics:   BowlingTactics,
    pitch:             PitchConditions,
    target:            Option<u32>,
    include_narrative: bool,
    rng:               &mut MatchRng,
) -> SimResult<serde_json::Value> {
    let striker = find_player(batting_team, state.striker())
        .ok_or_else(|| SimError::UnknownStriker { player_id: state.striker().clone() })?;
    let bowler = find_player(bowling_team, bowler_id)
        .ok_or_else(|| SimError::UnknownBowler { player_id: bowler_id.to_string() })?;

    let result = engine.simulate_ball(
        &BallRequest {
            state,
            striker,
            bowler,
            fielding_team: bowling_team,
            batting_tactics,
            bowling_tactics,
            pitch,
            target,
            include_narrative,
        },
        rng,
    )?;
    Ok(serde_json::to_value(result)?)
}

fn build_report(
    run_id:  String,
    seed:    u64,
    target:  Option<u32>,
    state:   &InningsState,
    batting: &[PlayerSkills],
    bowling: &[PlayerSkills],
) -> InningsReport {
    let batters = batting
        .iter()
        .filter_map(|p| {
            state.batter(&p.id).map(|f| BatterLine {
                id:          p.id.clone(),
                name:        p.name.clone(),
                runs:        f.runs,
                balls:       f.balls,
                fours:       f.fours,
                sixes:       f.sixes,
                strike_rate: f.strike_rate(),
                out:         state.is_dismissed(&p.id),
            })
        })
        .collect();

    let bowlers = bowling_order(state, bowling)
        .into_iter()
        .filter_map(|p| {
            state.bowler(&p.id).map(|f| BowlerLine {
                id:      p.id.clone(),
                name:    p.name.clone(),
                overs:   overs_bowled(state, &p.id),
                maidens: maidens(state, &p.id),
                runs:    f.runs,
                wickets: f.wickets,
                dots:    f.dots,
                economy: f.economy(),
            })
        })
        .collect();

    InningsReport {
        run_id,
        generated_at:    Utc::now(),
        seed,
        target,
        batting_team:    state.batting_team.clone(),
        bowling_team:    state.bowling_team.clone(),
        runs:            state.runs,
        wickets:         state.wickets,
        overs:           format!("{:.1}", state.overs_notation()),
        extras:          extras(state),
        batters,
        bowlers,
        fall_of_wickets: state.fall_of_wickets.clone(),
        over_by_over:    state.over_summaries.clone(),
    }
}

fn print_scorecard(state: &InningsState, batting: &[PlayerSkills], bowling: &[PlayerSkills], target: Option<u32>) {
    println!("=== {} INNINGS ===", state.batting_team.to_uppercase());
    println!("  {:<22} {:>4} {:>4} {:>3} {:>3} {:>7}", "Batter", "R", "B", "4s", "6s", "SR");
    for player in batting {
        let Some(f) = state.batter(&player.id) else { continue };
        let status = if state.is_dismissed(&player.id) { "" } else { "*" };
        println!(
            "  {:<22} {:>4} {:>4} {:>3} {:>3} {:>7.1}",
            format!("{}{status}", player.name), f.runs, f.balls, f.fours, f.sixes, f.strike_rate()
        );
    }
    println!("  Extras: {}", extras(state));
    println!("  TOTAL:  {}/{} ({:.1} overs)", state.runs, state.wickets, state.overs_notation());

    if !state.fall_of_wickets.is_empty() {
        let fow: Vec<String> = state
            .fall_of_wickets
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{}-{} ({}, {:.1})", i + 1, f.runs, f.player, f.overs))
            .collect();
        println!("  FoW: {}", fow.join(", "));
    }

    println!();
    println!("  {:<22} {:>5} {:>2} {:>4} {:>3} {:>4} {:>6}", "Bowler", "O", "M", "R", "W", "Dots", "Econ");
    for player in bowling_order(state, bowling) {
        let Some(f) = state.bowler(&player.id) else { continue };
        let economy = f.economy().map_or("-".to_string(), |e| format!("{e:.2}"));
        println!(
            "  {:<22} {:>5} {:>2} {:>4} {:>3} {:>4} {:>6}",
            player.name, overs_bowled(state, &player.id), maidens(state, &player.id), f.runs, f.wickets, f.dots, economy
        );
    }

    if let Some(target) = target {
        println!();
        if state.runs >= target {
            println!("  Target {target} reached with {} balls to spare", state.balls_remaining());
        } else {
            println!("  Fell {} runs short of {target}", target - state.runs);
        }
    }
}

/// Bowlers in the order they first came on.
fn bowling_order<'a>(state: &InningsState, bowling: &'a [PlayerSkills]) -> Vec<&'a PlayerSkills> {
    let mut order: Vec<&PlayerSkills> = Vec::new();
    for over in &state.over_summaries {
        if let Some(p) = find_player(bowling, &over.bowler) {
            if !order.iter().any(|seen| seen.id == p.id) {
                order.push(p);
            }
        }
    }
    order
}

/// Overs in cricket notation, including a part-bowled final over.
fn overs_bowled(state: &InningsState, bowler_id: &str) -> String {
    let complete = state.bowler(bowler_id).map_or(0, |f| f.overs);
    let partial = state
        .over_summaries
        .last()
        .filter(|o| o.bowler == bowler_id)
        .map(|o| o.balls.iter().filter(|b| b.outcome.is_legal()).count() as u32)
        .filter(|legal| *legal < BALLS_PER_OVER)
        .unwrap_or(0);
    if partial > 0 {
        format!("{complete}.{partial}")
    } else {
        complete.to_string()
    }
}

fn maidens(state: &InningsState, bowler_id: &str) -> u32 {
    state
        .over_summaries
        .iter()
        .filter(|o| o.bowler == bowler_id && o.is_maiden())
        .count() as u32
}

fn extras(state: &InningsState) -> u32 {
    state
        .over_summaries
        .iter()
        .flat_map(|o| o.balls.iter())
        .filter(|b| !b.outcome.is_legal())
        .map(|b| b.outcome.team_runs())
        .sum()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
