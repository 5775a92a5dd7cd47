//! Deterministic squad generation for headless runs.
//!
//! Same RNG stream = same eleven. Batting order is fixed by role:
//! four specialist batters, the keeper, two all-rounders, four bowlers.

use cricket_core::{
    player::{BattingSkills, BowlingSkills, BowlingStyle, FieldingSkills, PlayerRole, PlayerSkills},
    rng::RandomSource,
};

const FIRST_NAMES: &[&str] = &[
    "Aaron", "Ben", "Chris", "Dinesh", "Eoin", "Faf", "Glenn", "Hashim", "Imran", "Jos",
    "Kane", "Liam", "Mitchell", "Nathan", "Ollie", "Pat", "Quinton", "Rashid", "Shai", "Tim",
    "Usman", "Virat", "Wanindu", "Yuzvendra", "Zak", "Adil", "Devon", "Jason", "Moeen", "Trent",
];

const LAST_NAMES: &[&str] = &[
    "Archer", "Bairstow", "Carey", "Dhawan", "Ellis", "Finch", "Gill", "Hales", "Iyer", "Jordan",
    "Khan", "Livingstone", "Marsh", "Nortje", "Overton", "Pant", "Rabada", "Santner", "Topley",
    "Umran", "Vince", "Wood", "Yadav", "Zampa", "Conway", "Hetmyer", "Mills", "Philips", "Rahul", "Stoinis",
];

const PACE_STYLES: &[BowlingStyle] = &[
    BowlingStyle::RightArmFast,
    BowlingStyle::LeftArmFast,
    BowlingStyle::RightArmMedium,
    BowlingStyle::LeftArmMedium,
];

const SPIN_STYLES: &[BowlingStyle] = &[BowlingStyle::OffSpin, BowlingStyle::LegSpin, BowlingStyle::LeftArmSpin];

#[derive(Clone, Copy)]
enum Slot {
    Batter,
    Keeper,
    Allrounder,
    Pace,
    Spin,
}

const BATTING_ORDER: [Slot; 11] = [
    Slot::Batter,
    Slot::Batter,
    Slot::Batter,
    Slot::Batter,
    Slot::Keeper,
    Slot::Allrounder,
    Slot::Allrounder,
    Slot::Pace,
    Slot::Spin,
    Slot::Pace,
    Slot::Pace,
];

/// Eleven players in batting order, ids `{team}-01`..`{team}-11`.
pub fn generate_squad(team: &str, rng: &mut dyn RandomSource) -> Vec<PlayerSkills> {
    BATTING_ORDER
        .iter()
        .enumerate()
        .map(|(i, slot)| generate_player(&format!("{team}-{:02}", i + 1), *slot, rng))
        .collect()
}

fn generate_player(id: &str, slot: Slot, rng: &mut dyn RandomSource) -> PlayerSkills {
    let first = FIRST_NAMES[rng.index_below(FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.index_below(LAST_NAMES.len())];

    let (role, bowling_style, bat_range, bowl_range) = match slot {
        Slot::Batter     => (PlayerRole::Batter, None, (60, 90), (15, 40)),
        Slot::Keeper     => (PlayerRole::Keeper, None, (55, 80), (10, 25)),
        Slot::Allrounder => {
            let style = if rng.chance(0.5) { pick(PACE_STYLES, rng) } else { pick(SPIN_STYLES, rng) };
            (PlayerRole::Allrounder, Some(style), (50, 75), (50, 75))
        }
        Slot::Pace => (PlayerRole::Bowler, Some(pick(PACE_STYLES, rng)), (15, 45), (60, 90)),
        Slot::Spin => (PlayerRole::Bowler, Some(pick(SPIN_STYLES, rng)), (20, 45), (60, 88)),
    };
    let spinner = bowling_style.is_some_and(|s| s.is_spin());

    let batting = BattingSkills {
        technique:   roll(rng, bat_range),
        power:       roll(rng, bat_range),
        timing:      roll(rng, bat_range),
        temperament: roll(rng, bat_range),
    };
    let bowling = BowlingSkills {
        speed:     if spinner { roll(rng, (35, 55)) } else { roll(rng, bowl_range) },
        accuracy:  roll(rng, bowl_range),
        variation: if spinner { roll(rng, (65, 92)) } else { roll(rng, bowl_range) },
        stamina:   roll(rng, (55, 90)),
    };
    let fielding = FieldingSkills {
        catching:    roll(rng, (40, 85)),
        ground:      roll(rng, (40, 85)),
        throwing:    roll(rng, (40, 85)),
        athleticism: roll(rng, (40, 85)),
    };

    PlayerSkills {
        id:         id.to_string(),
        name:       format!("{first} {last}"),
        short_name: format!("{}. {last}", &first[..1]),
        role,
        bowling_style,
        batting,
        bowling,
        fielding,
        form:    roll(rng, (0, 20)) as i8 - 10,
        fitness: roll(rng, (75, 100)),
        morale:  roll(rng, (50, 90)),
        fatigue: roll(rng, (0, 20)),
    }
}

/// Uniform integer in [lo, hi].
fn roll(rng: &mut dyn RandomSource, (lo, hi): (u8, u8)) -> u8 {
    lo + rng.index_below((hi - lo) as usize + 1) as u8
}

fn pick(styles: &[BowlingStyle], rng: &mut dyn RandomSource) -> BowlingStyle {
    styles[rng.index_below(styles.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_core::rng::RngBank;

    #[test]
    fn squad_generation_is_deterministic() {
        let a = generate_squad("home", &mut RngBank::new(99).for_setup());
        let b = generate_squad("home", &mut RngBank::new(99).for_setup());
        assert_eq!(a, b);
    }

    #[test]
    fn generated_players_are_valid_and_can_bowl_twenty_overs() {
        let squad = generate_squad("away", &mut RngBank::new(5).for_setup());
        assert_eq!(squad.len(), 11);
        for player in &squad {
            player.validate().expect("generated skills in range");
        }
        let bowlers = squad.iter().filter(|p| p.role.bowls()).count();
        assert_eq!(bowlers, 6);
    }
}
