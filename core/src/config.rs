//! Probability configuration table.
//!
//! Loaded once, validated, then shared read-only by every simulation.
//! Only `base_outcomes` is required; every other section defaults to
//! neutral and every table lookup that misses returns a 1.0 multiplier.

use crate::{
    buckets::{CountBucket, DotsBand, PartnershipBand, RecentRunsBand, RequiredRateBand},
    context::{BatsmanState, MatchPhase},
    error::{SimError, SimResult},
    outcome::DismissalKind,
    probability::OutcomeProbabilities,
    tactics::{BowlingLength, FieldSetting, TacticalApproach},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, OnceLock},
};

pub const CONFIG_FILE_NAME: &str = "probability_params.json";

// ── Modifiers ────────────────────────────────────────────────────────────────

fn one() -> f64 {
    1.0
}

/// Multipliers applied to one stage of the pipeline.
/// Boundary scales both four and six.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    #[serde(default = "one")]
    pub boundary_mod: f64,
    #[serde(default = "one")]
    pub wicket_mod:   f64,
    #[serde(default = "one")]
    pub dot_mod:      f64,
    #[serde(default = "one")]
    pub single_mod:   f64,
}

impl Modifier {
    pub const NEUTRAL: Modifier = Modifier {
        boundary_mod: 1.0,
        wicket_mod:   1.0,
        dot_mod:      1.0,
        single_mod:   1.0,
    };

    pub const fn new(boundary_mod: f64, wicket_mod: f64, dot_mod: f64, single_mod: f64) -> Self {
        Self { boundary_mod, wicket_mod, dot_mod, single_mod }
    }

    /// Boundary and wicket only.
    pub const fn bw(boundary_mod: f64, wicket_mod: f64) -> Self {
        Self::new(boundary_mod, wicket_mod, 1.0, 1.0)
    }

    /// Boundary, wicket and dot.
    pub const fn bwd(boundary_mod: f64, wicket_mod: f64, dot_mod: f64) -> Self {
        Self::new(boundary_mod, wicket_mod, dot_mod, 1.0)
    }

    fn check(&self, table: &str) -> SimResult<()> {
        let values = [self.boundary_mod, self.wicket_mod, self.dot_mod, self.single_mod];
        if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
            Ok(())
        } else {
            Err(invalid(format!("{table}: multipliers must be finite and >= 0, got {self:?}")))
        }
    }
}

impl Default for Modifier {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A keyed modifier table with neutral-on-miss lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierTable<K: Eq + Hash>(HashMap<K, Modifier>);

impl<K: Eq + Hash> ModifierTable<K> {
    /// The configured modifier, or NEUTRAL when the key is absent.
    pub fn get(&self, key: &K) -> Modifier {
        self.0.get(key).copied().unwrap_or(Modifier::NEUTRAL)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, key: K, modifier: Modifier) {
        self.0.insert(key, modifier);
    }

    fn check(&self, table: &str) -> SimResult<()> {
        self.0.values().try_for_each(|m| m.check(table))
    }
}

impl<K: Eq + Hash> Default for ModifierTable<K> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K: Eq + Hash> FromIterator<(K, Modifier)> for ModifierTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, Modifier)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Sections ─────────────────────────────────────────────────────────────────

/// Per-ball base rates. Every key is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseOutcomes {
    pub dot:    f64,
    pub single: f64,
    pub two:    f64,
    pub three:  f64,
    pub four:   f64,
    pub six:    f64,
    pub wicket: f64,
}

impl BaseOutcomes {
    pub fn to_probabilities(&self) -> OutcomeProbabilities {
        OutcomeProbabilities {
            dot:    self.dot,
            single: self.single,
            two:    self.two,
            three:  self.three,
            four:   self.four,
            six:    self.six,
            wicket: self.wicket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatsmanThresholds {
    /// Balls faced below which a batter is "new".
    pub new:      u32,
    /// Balls faced below which a batter is still "settling".
    pub settling: u32,
}

impl Default for BatsmanThresholds {
    fn default() -> Self {
        Self { new: 6, settling: 15 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatsmanStateConfig {
    #[serde(default)]
    pub thresholds: BatsmanThresholds,
    #[serde(default)]
    pub modifiers:  ModifierTable<BatsmanState>,
}

/// Which bowling skill a length depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthSkill {
    Speed,
    Variation,
    Accuracy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthModifier {
    pub skill_type: LengthSkill,
    pub min_skill:  u8,
    #[serde(flatten)]
    pub modifier:   Modifier,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PressureConfig {
    #[serde(default)]
    pub recent_wickets: ModifierTable<CountBucket>,
    #[serde(default)]
    pub bowler_on_roll: ModifierTable<CountBucket>,
    #[serde(default)]
    pub partnership:    ModifierTable<PartnershipBand>,
    #[serde(default)]
    pub required_rate:  ModifierTable<RequiredRateBand>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    #[serde(default)]
    pub recent_runs:       ModifierTable<RecentRunsBand>,
    #[serde(default)]
    pub recent_boundaries: ModifierTable<CountBucket>,
    #[serde(default)]
    pub recent_dots:       ModifierTable<DotsBand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrasConfig {
    pub wide_chance:   f64,
    pub noball_chance: f64,
}

impl Default for ExtrasConfig {
    fn default() -> Self {
        Self { wide_chance: 0.02, noball_chance: 0.01 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundarySaveConfig {
    pub max_chance:          f64,
    /// Skill level at which fielding neither saves nor leaks boundaries.
    pub baseline:            f64,
    pub athleticism_divisor: f64,
    pub ground_divisor:      f64,
    /// Share of saves that become two runs; the rest become three.
    pub two_run_share:       f64,
}

impl Default for BoundarySaveConfig {
    fn default() -> Self {
        Self {
            max_chance:          0.30,
            baseline:            50.0,
            athleticism_divisor: 200.0,
            ground_divisor:      400.0,
            two_run_share:       0.70,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldingConfig {
    #[serde(default)]
    pub boundary_save: BoundarySaveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DismissalConfig {
    pub pace: Vec<(DismissalKind, f64)>,
    pub spin: Vec<(DismissalKind, f64)>,
}

impl Default for DismissalConfig {
    fn default() -> Self {
        Self {
            pace: vec![(DismissalKind::Caught, 1.0)],
            spin: vec![(DismissalKind::Caught, 1.0)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BowlingRules {
    pub max_overs_per_bowler: u32,
}

impl Default for BowlingRules {
    fn default() -> Self {
        Self { max_overs_per_bowler: 4 }
    }
}

// ── Root ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityConfig {
    pub base_outcomes: BaseOutcomes,
    #[serde(default)]
    pub phase_modifiers: ModifierTable<MatchPhase>,
    #[serde(default)]
    pub batsman_state: BatsmanStateConfig,
    #[serde(default)]
    pub tactical_modifiers: ModifierTable<TacticalApproach>,
    #[serde(default)]
    pub bowling_length_modifiers: HashMap<BowlingLength, LengthModifier>,
    #[serde(default)]
    pub field_setting_modifiers: ModifierTable<FieldSetting>,
    #[serde(default)]
    pub pressure: PressureConfig,
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub extras: ExtrasConfig,
    #[serde(default)]
    pub fielding: FieldingConfig,
    #[serde(default)]
    pub dismissals: DismissalConfig,
    #[serde(default)]
    pub rules: BowlingRules,
}

impl ProbabilityConfig {
    /// Load from `{data_dir}/probability_params.json`.
    /// In tests, use ProbabilityConfig::standard().
    pub fn load(data_dir: &str) -> SimResult<Self> {
        let path = format!("{data_dir}/{CONFIG_FILE_NAME}");
        let content = std::fs::read_to_string(&path)
            .map_err(|source| SimError::ConfigRead { path: path.clone(), source })?;
        let config = Self::from_json_str(&content)?;
        log::info!(
            "probability config loaded from {path}: {} phases, {} lengths",
            config.phase_modifiers.len(),
            config.bowling_length_modifiers.len()
        );
        if config.phase_modifiers.is_empty() {
            log::warn!("{path}: no phase_modifiers, every phase is neutral");
        }
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables the pipeline cannot turn into a distribution.
    pub fn validate(&self) -> SimResult<()> {
        let base = self.base_outcomes.to_probabilities();
        if base.values().iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(invalid("base_outcomes: rates must be finite and >= 0"));
        }
        if base.total() <= 0.0 {
            return Err(invalid("base_outcomes: rates must not all be zero"));
        }

        self.phase_modifiers.check("phase_modifiers")?;
        self.batsman_state.modifiers.check("batsman_state")?;
        self.tactical_modifiers.check("tactical_modifiers")?;
        self.field_setting_modifiers.check("field_setting_modifiers")?;
        self.pressure.recent_wickets.check("pressure.recent_wickets")?;
        self.pressure.bowler_on_roll.check("pressure.bowler_on_roll")?;
        self.pressure.partnership.check("pressure.partnership")?;
        self.pressure.required_rate.check("pressure.required_rate")?;
        self.momentum.recent_runs.check("momentum.recent_runs")?;
        self.momentum.recent_boundaries.check("momentum.recent_boundaries")?;
        self.momentum.recent_dots.check("momentum.recent_dots")?;
        for length in self.bowling_length_modifiers.values() {
            length.modifier.check("bowling_length_modifiers")?;
            if length.min_skill > 100 {
                return Err(invalid("bowling_length_modifiers: min_skill must be <= 100"));
            }
        }

        let thresholds = self.batsman_state.thresholds;
        if thresholds.new > thresholds.settling {
            return Err(invalid(format!(
                "batsman_state.thresholds: new ({}) must not exceed settling ({})",
                thresholds.new, thresholds.settling
            )));
        }

        let extras = self.extras;
        let extras_ok = [extras.wide_chance, extras.noball_chance]
            .iter()
            .all(|c| c.is_finite() && *c >= 0.0);
        if !extras_ok || extras.wide_chance + extras.noball_chance >= 1.0 {
            return Err(invalid("extras: chances must be >= 0 and sum below 1"));
        }

        let save = self.fielding.boundary_save;
        if !(0.0..=1.0).contains(&save.max_chance) || !(0.0..=1.0).contains(&save.two_run_share) {
            return Err(invalid("fielding.boundary_save: max_chance and two_run_share must be in [0,1]"));
        }
        if save.athleticism_divisor <= 0.0 || save.ground_divisor <= 0.0 {
            return Err(invalid("fielding.boundary_save: divisors must be positive"));
        }

        let weights = self.dismissals.pace.iter().chain(self.dismissals.spin.iter());
        for (kind, weight) in weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(invalid(format!("dismissals: weight for {kind:?} must be >= 0")));
            }
        }

        if self.rules.max_overs_per_bowler == 0 {
            return Err(invalid("rules.max_overs_per_bowler must be at least 1"));
        }
        Ok(())
    }

    /// Built-in table calibrated against T20 delivery outcome rates.
    /// Mirrors data/probability_params.json.
    pub fn standard() -> Self {
        use BatsmanState as S;
        use CountBucket as C;
        use Modifier as M;

        let base_outcomes = BaseOutcomes {
            dot:    0.345,
            single: 0.370,
            two:    0.065,
            three:  0.005,
            four:   0.115,
            six:    0.050,
            wicket: 0.050,
        };

        let phase_modifiers = [
            (MatchPhase::Powerplay, M::bwd(1.10, 0.90, 1.12)),
            (MatchPhase::Middle,    M::bwd(0.88, 0.95, 0.92)),
            (MatchPhase::Death,     M::bwd(1.25, 1.35, 0.85)),
        ].into_iter().collect();

        let batsman_state = BatsmanStateConfig {
            thresholds: BatsmanThresholds::default(),
            modifiers: [
                (S::New,      M::new(0.75, 1.30, 1.15, 0.95)),
                (S::Settling, M::bwd(0.95, 1.05, 1.00)),
                (S::Set,      M::new(1.10, 0.85, 0.92, 1.03)),
            ].into_iter().collect(),
        };

        let tactical_modifiers = [
            (TacticalApproach::Aggressive, M::bwd(1.30, 1.25, 0.85)),
            (TacticalApproach::Balanced,   M::NEUTRAL),
            (TacticalApproach::Cautious,   M::new(0.70, 0.75, 1.15, 1.05)),
        ].into_iter().collect();

        let bowling_length_modifiers = [
            (BowlingLength::GoodLength, LengthModifier {
                skill_type: LengthSkill::Accuracy,
                min_skill:  50,
                modifier:   M::bwd(0.90, 1.10, 1.05),
            }),
            (BowlingLength::Short, LengthModifier {
                skill_type: LengthSkill::Speed,
                min_skill:  65,
                modifier:   M::bwd(1.05, 1.10, 1.00),
            }),
            (BowlingLength::Yorkers, LengthModifier {
                skill_type: LengthSkill::Speed,
                min_skill:  70,
                modifier:   M::bwd(0.70, 1.15, 1.10),
            }),
            (BowlingLength::FullPitched, LengthModifier {
                skill_type: LengthSkill::Variation,
                min_skill:  55,
                modifier:   M::bwd(1.15, 1.20, 0.90),
            }),
        ].into_iter().collect();

        let field_setting_modifiers = [
            (FieldSetting::Attacking,  M::bw(1.15, 1.15)),
            (FieldSetting::Balanced,   M::NEUTRAL),
            (FieldSetting::Defensive,  M::new(0.80, 0.90, 0.95, 1.10)),
            (FieldSetting::DeathField, M::new(0.85, 1.00, 1.00, 1.05)),
        ].into_iter().collect();

        let pressure = PressureConfig {
            recent_wickets: [
                (C::One,       M::bwd(0.95, 1.00, 1.03)),
                (C::Two,       M::bwd(0.85, 1.05, 1.08)),
                (C::ThreePlus, M::bwd(0.75, 1.10, 1.15)),
            ].into_iter().collect(),
            bowler_on_roll: [
                (C::One,       M::bw(0.97, 1.00)),
                (C::Two,       M::bw(0.92, 1.05)),
                (C::ThreePlus, M::bw(0.85, 1.10)),
            ].into_iter().collect(),
            partnership: [
                (PartnershipBand::Fledgling,   M::bw(0.95, 1.10)),
                (PartnershipBand::Steady,      M::NEUTRAL),
                (PartnershipBand::Established, M::bw(1.05, 0.95)),
                (PartnershipBand::Fifty,       M::bw(1.10, 0.90)),
                (PartnershipBand::Dominant,    M::bw(1.15, 0.88)),
                (PartnershipBand::Century,     M::bw(1.20, 0.85)),
            ].into_iter().collect(),
            required_rate: [
                (RequiredRateBand::Comfortable, M::bw(0.90, 0.90)),
                (RequiredRateBand::Par,         M::NEUTRAL),
                (RequiredRateBand::Stretching,  M::bw(1.15, 1.15)),
                (RequiredRateBand::Desperate,   M::bw(1.35, 1.40)),
            ].into_iter().collect(),
        };

        let momentum = MomentumConfig {
            recent_runs: [
                (RecentRunsBand::Stalled, M::bwd(0.95, 1.00, 1.05)),
                (RecentRunsBand::Brisk,   M::bw(1.05, 1.00)),
                (RecentRunsBand::Flying,  M::bw(1.10, 1.05)),
            ].into_iter().collect(),
            recent_boundaries: [
                (C::Two,       M::bw(1.05, 1.00)),
                (C::ThreePlus, M::bw(1.08, 1.08)),
            ].into_iter().collect(),
            recent_dots: [
                (DotsBand::Building,  M::bw(1.05, 1.05)),
                (DotsBand::Strangled, M::bw(1.10, 1.12)),
            ].into_iter().collect(),
        };

        let dismissals = DismissalConfig {
            pace: vec![
                (DismissalKind::Caught,    0.58),
                (DismissalKind::Bowled,    0.20),
                (DismissalKind::Lbw,       0.12),
                (DismissalKind::RunOut,    0.08),
                (DismissalKind::Stumped,   0.01),
                (DismissalKind::HitWicket, 0.01),
            ],
            spin: vec![
                (DismissalKind::Caught,    0.52),
                (DismissalKind::Bowled,    0.14),
                (DismissalKind::Lbw,       0.14),
                (DismissalKind::RunOut,    0.06),
                (DismissalKind::Stumped,   0.13),
                (DismissalKind::HitWicket, 0.01),
            ],
        };

        Self {
            base_outcomes,
            phase_modifiers,
            batsman_state,
            tactical_modifiers,
            bowling_length_modifiers,
            field_setting_modifiers,
            pressure,
            momentum,
            extras: ExtrasConfig { wide_chance: 0.030, noball_chance: 0.006 },
            fielding: FieldingConfig::default(),
            dismissals,
            rules: BowlingRules::default(),
        }
    }

    /// The standard table, built once per process.
    pub fn shared_standard() -> Arc<Self> {
        static STANDARD: OnceLock<Arc<ProbabilityConfig>> = OnceLock::new();
        Arc::clone(STANDARD.get_or_init(|| Arc::new(Self::standard())))
    }
}

fn invalid(reason: impl Into<String>) -> SimError {
    SimError::InvalidConfig { reason: reason.into() }
}
