//! Bucket keys for the pressure and momentum modifier tables.
//!
//! Each key has exactly one canonical JSON spelling (the serde rename).
//! Classification from raw counts lives here so the model and the
//! configuration agree on band edges.

use serde::{Deserialize, Serialize};

/// Small event counts: 0, 1, 2, 3 or more.
///
/// Used for recent wickets, bowler wickets this innings, and
/// boundaries in the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountBucket {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3_plus")]
    ThreePlus,
}

impl CountBucket {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Self::Zero,
            1 => Self::One,
            2 => Self::Two,
            _ => Self::ThreePlus,
        }
    }
}

/// Partnership size in runs, seven bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartnershipBand {
    #[serde(rename = "0_10")]
    Fledgling,
    #[serde(rename = "10_20")]
    Building,
    #[serde(rename = "20_30")]
    Steady,
    #[serde(rename = "30_50")]
    Established,
    #[serde(rename = "50_75")]
    Fifty,
    #[serde(rename = "75_100")]
    Dominant,
    #[serde(rename = "100_plus")]
    Century,
}

impl PartnershipBand {
    pub fn from_runs(runs: u32) -> Self {
        match runs {
            0..=9   => Self::Fledgling,
            10..=19 => Self::Building,
            20..=29 => Self::Steady,
            30..=49 => Self::Established,
            50..=74 => Self::Fifty,
            75..=99 => Self::Dominant,
            _       => Self::Century,
        }
    }
}

/// Required run rate per over in a chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredRateBand {
    #[serde(rename = "up_to_6")]
    Comfortable,
    #[serde(rename = "6_to_9")]
    Par,
    #[serde(rename = "9_to_12")]
    Stretching,
    #[serde(rename = "over_12")]
    Desperate,
}

impl RequiredRateBand {
    pub fn from_rate(rate: f64) -> Self {
        if rate <= 6.0 {
            Self::Comfortable
        } else if rate <= 9.0 {
            Self::Par
        } else if rate <= 12.0 {
            Self::Stretching
        } else {
            Self::Desperate
        }
    }
}

/// Runs scored off the last six legal balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecentRunsBand {
    #[serde(rename = "0_3")]
    Stalled,
    #[serde(rename = "4_8")]
    Ticking,
    #[serde(rename = "9_14")]
    Brisk,
    #[serde(rename = "15_plus")]
    Flying,
}

impl RecentRunsBand {
    pub fn from_runs(runs: u32) -> Self {
        match runs {
            0..=3  => Self::Stalled,
            4..=8  => Self::Ticking,
            9..=14 => Self::Brisk,
            _      => Self::Flying,
        }
    }
}

/// Dot balls among the last six legal balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DotsBand {
    #[serde(rename = "0_2")]
    Flowing,
    #[serde(rename = "3_4")]
    Building,
    #[serde(rename = "5_6")]
    Strangled,
}

impl DotsBand {
    pub fn from_dots(dots: u32) -> Self {
        match dots {
            0..=2 => Self::Flowing,
            3..=4 => Self::Building,
            _     => Self::Strangled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_bucket_caps_at_three_plus() {
        assert_eq!(CountBucket::from_count(0), CountBucket::Zero);
        assert_eq!(CountBucket::from_count(2), CountBucket::Two);
        assert_eq!(CountBucket::from_count(3), CountBucket::ThreePlus);
        assert_eq!(CountBucket::from_count(9), CountBucket::ThreePlus);
    }

    #[test]
    fn partnership_band_edges_belong_to_upper_band() {
        assert_eq!(PartnershipBand::from_runs(9), PartnershipBand::Fledgling);
        assert_eq!(PartnershipBand::from_runs(10), PartnershipBand::Building);
        assert_eq!(PartnershipBand::from_runs(49), PartnershipBand::Established);
        assert_eq!(PartnershipBand::from_runs(50), PartnershipBand::Fifty);
        assert_eq!(PartnershipBand::from_runs(100), PartnershipBand::Century);
    }

    #[test]
    fn required_rate_edges_belong_to_lower_band() {
        assert_eq!(RequiredRateBand::from_rate(6.0), RequiredRateBand::Comfortable);
        assert_eq!(RequiredRateBand::from_rate(6.01), RequiredRateBand::Par);
        assert_eq!(RequiredRateBand::from_rate(12.0), RequiredRateBand::Stretching);
        assert_eq!(RequiredRateBand::from_rate(12.5), RequiredRateBand::Desperate);
        assert_eq!(RequiredRateBand::from_rate(-3.0), RequiredRateBand::Comfortable);
    }

    #[test]
    fn bucket_keys_use_canonical_strings() {
        let json = serde_json::to_string(&CountBucket::ThreePlus).unwrap();
        assert_eq!(json, "\"3_plus\"");
        let band: PartnershipBand = serde_json::from_str("\"100_plus\"").unwrap();
        assert_eq!(band, PartnershipBand::Century);
    }
}
