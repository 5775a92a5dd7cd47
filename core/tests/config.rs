use cricket_core::{
    buckets::{CountBucket, PartnershipBand},
    config::{Modifier, ProbabilityConfig},
    context::MatchPhase,
    error::SimError,
    tactics::BowlingLength,
};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_table_loads_from_data_dir() {
    let config = ProbabilityConfig::load(&data_dir()).expect("shipped config loads");
    assert_eq!(config.phase_modifiers.len(), 3);
    assert_eq!(config.bowling_length_modifiers.len(), 4);
    assert_eq!(config.rules.max_overs_per_bowler, 4);
    assert_eq!(config.phase_modifiers.get(&MatchPhase::Death), Modifier::bwd(1.25, 1.35, 0.85));
}

#[test]
fn missing_file_is_a_read_error() {
    let result = ProbabilityConfig::load("/definitely/not/a/data/dir");
    assert!(matches!(result, Err(SimError::ConfigRead { .. })), "got {result:?}");
}

#[test]
fn missing_base_outcome_key_is_fatal() {
    let result = ProbabilityConfig::from_json_str(
        r#"{ "base_outcomes": { "dot": 0.4, "single": 0.3, "two": 0.1, "three": 0.0, "four": 0.1, "six": 0.1 } }"#,
    );
    assert!(matches!(result, Err(SimError::Serialization(_))), "got {result:?}");
}

#[test]
fn negative_multiplier_is_rejected() {
    let result = ProbabilityConfig::from_json_str(
        r#"{
            "base_outcomes": { "dot": 0.4, "single": 0.3, "two": 0.1, "three": 0.0,
                               "four": 0.1, "six": 0.05, "wicket": 0.05 },
            "phase_modifiers": { "death": { "boundary_mod": -1.0 } }
        }"#,
    );
    assert!(matches!(result, Err(SimError::InvalidConfig { .. })), "got {result:?}");
}

#[test]
fn extras_must_leave_room_for_legal_balls() {
    let mut config = ProbabilityConfig::standard();
    config.extras.wide_chance = 0.6;
    config.extras.noball_chance = 0.4;
    assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
}

#[test]
fn all_zero_base_rates_are_rejected() {
    let result = ProbabilityConfig::from_json_str(
        r#"{ "base_outcomes": { "dot": 0, "single": 0, "two": 0, "three": 0, "four": 0, "six": 0, "wicket": 0 } }"#,
    );
    assert!(matches!(result, Err(SimError::InvalidConfig { .. })), "got {result:?}");
}

#[test]
fn sparse_tables_fill_in_as_neutral() {
    let config = ProbabilityConfig::from_json_str(
        r#"{
            "base_outcomes": { "dot": 0.4, "single": 0.3, "two": 0.1, "three": 0.0,
                               "four": 0.1, "six": 0.05, "wicket": 0.05 },
            "pressure": { "recent_wickets": { "2": { "wicket_mod": 1.2 } } }
        }"#,
    )
    .expect("sparse config parses");

    assert_eq!(config.pressure.recent_wickets.get(&CountBucket::Two), Modifier::new(1.0, 1.2, 1.0, 1.0));
    assert_eq!(config.pressure.recent_wickets.get(&CountBucket::One), Modifier::NEUTRAL);
    assert_eq!(config.pressure.partnership.get(&PartnershipBand::Building), Modifier::NEUTRAL);
    assert!(config.bowling_length_modifiers.get(&BowlingLength::Yorkers).is_none());
    assert_eq!(config.rules.max_overs_per_bowler, 4);
}

#[test]
fn standard_table_round_trips_through_json() {
    let standard = ProbabilityConfig::standard();
    let json = standard.to_json_pretty().expect("serialize");
    let parsed = ProbabilityConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, standard);
}

#[test]
fn shared_standard_is_built_once() {
    let a = ProbabilityConfig::shared_standard();
    let b = ProbabilityConfig::shared_standard();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}
