//! Ball-by-ball commentary lines.
//!
//! Template choice is keyed off the ball's position in the innings, never
//! off the RandomSource, so asking for commentary cannot change results.

use crate::{
    innings::BallEvent,
    outcome::{DismissalKind, ExtraKind, Outcome},
    player::PlayerSkills,
};

const DOT: &[&str] = &[
    "{bowler} to {batter}, no run, defended solidly",
    "{bowler} to {batter}, beaten outside off",
    "{bowler} to {batter}, straight to the fielder, no run",
];

const SINGLE: &[&str] = &[
    "{bowler} to {batter}, worked away for a single",
    "{bowler} to {batter}, pushed into the gap, one run",
    "{bowler} to {batter}, quick single taken",
];

const TWO: &[&str] = &[
    "{bowler} to {batter}, driven into the deep, they come back for two",
    "{bowler} to {batter}, good running, two runs",
];

const THREE: &[&str] = &[
    "{bowler} to {batter}, chased down just short of the rope, three runs",
];

const FOUR: &[&str] = &[
    "{bowler} to {batter}, FOUR! crunched through the covers",
    "{bowler} to {batter}, FOUR! pulled hard to the fence",
    "{bowler} to {batter}, FOUR! flicked fine, no stopping that",
];

const SIX: &[&str] = &[
    "{bowler} to {batter}, SIX! launched over long-on",
    "{bowler} to {batter}, SIX! cleared the ropes with ease",
];

const SAVED: &[&str] = &[
    "{bowler} to {batter}, brilliant save in the deep, {runs} runs",
    "{bowler} to {batter}, diving stop on the rope keeps it to {runs}",
];

/// One commentary line for a delivery.
pub fn describe(event: &BallEvent, batter: &PlayerSkills, bowler: &PlayerSkills) -> String {
    let position = (event.over * 6 + event.ball) as usize;
    let template = match event.outcome {
        Outcome::Runs { runs, boundary_saved: true } => {
            return fill(pick(SAVED, position), batter, bowler).replace("{runs}", &runs.to_string());
        }
        Outcome::Runs { runs: 0, .. } => pick(DOT, position),
        Outcome::Runs { runs: 1, .. } => pick(SINGLE, position),
        Outcome::Runs { runs: 2, .. } => pick(TWO, position),
        Outcome::Runs { runs: 3, .. } => pick(THREE, position),
        Outcome::Runs { runs: 4, .. } => pick(FOUR, position),
        Outcome::Runs { runs: 6, .. } => pick(SIX, position),
        Outcome::Runs { runs, .. } => {
            return format!("{} to {}, {runs} runs", bowler.short_name, batter.short_name);
        }
        Outcome::Wicket { dismissal, .. } => {
            return format!("{} to {}, OUT! {}", bowler.short_name, batter.short_name, dismissal_line(dismissal, bowler));
        }
        Outcome::Extra { kind: ExtraKind::Wide, .. } => "{bowler} to {batter}, wide, strays down the leg side",
        Outcome::Extra { kind: ExtraKind::NoBall, .. } => "{bowler} to {batter}, no-ball, overstepped",
    };
    fill(template, batter, bowler)
}

fn dismissal_line(kind: DismissalKind, bowler: &PlayerSkills) -> String {
    match kind {
        DismissalKind::Bowled    => "clean bowled, the stumps are shattered".to_string(),
        DismissalKind::Caught    => "edged and taken".to_string(),
        DismissalKind::Lbw       => "trapped in front, given lbw".to_string(),
        DismissalKind::RunOut    => "run out, a direct hit catches them short".to_string(),
        DismissalKind::Stumped   => "stumped, drawn out of the crease".to_string(),
        DismissalKind::HitWicket => format!("hit wicket, knocks the bails off against {}", bowler.short_name),
    }
}

fn pick(templates: &'static [&'static str], position: usize) -> &'static str {
    templates[position % templates.len()]
}

fn fill(template: &str, batter: &PlayerSkills, bowler: &PlayerSkills) -> String {
    template
        .replace("{bowler}", &bowler.short_name)
        .replace("{batter}", &batter.short_name)
}
