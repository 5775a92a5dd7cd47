//! Random number sources for ball resolution.
//!
//! RULE: Nothing in the engine may call a platform RNG.
//! Every draw flows through a RandomSource handed in by the caller.
//!
//! Seeded play derives one stream per over from a single master seed:
//!   - Replaying an over only needs (master_seed, over_number).
//!   - Adding draws to one over never shifts another over's stream.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::VecDeque;

/// The injection seam for every random draw the engine makes.
pub trait RandomSource {
    /// A float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in [0, n). Returns 0 when n is 0.
    fn index_below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }
}

/// A named, deterministic PCG stream.
pub struct MatchRng {
    pub name: &'static str,
    inner:    Pcg64Mcg,
}

impl MatchRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            name:  "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl RandomSource for MatchRng {
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// All streams for a single innings, derived from one master seed.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream for one over. The over index must be the innings over
    /// number (0-based) so a resumed innings draws the same values.
    pub fn for_over(&self, over: u32) -> MatchRng {
        MatchRng::seeded(self.derive(StreamSlot::Over, over as u64)).with_name("over")
    }

    /// The stream used for squad generation and other setup draws.
    pub fn for_setup(&self) -> MatchRng {
        MatchRng::seeded(self.derive(StreamSlot::Setup, 0)).with_name("setup")
    }

    fn derive(&self, slot: StreamSlot, index: u64) -> u64 {
        let slot_bits = (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        let index_bits = index.wrapping_add(1).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        self.master_seed ^ slot_bits ^ index_bits
    }
}

/// Stable stream slots. Append only: reordering changes every stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
enum StreamSlot {
    Over  = 0,
    Setup = 1,
}

/// Replays a fixed list of draws, then repeats the fallback value.
///
/// Used to force exact outcomes in tests and tooling.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws:    VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws:    draws.into_iter().collect(),
            fallback: 0.0,
            consumed: 0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of draws taken so far, scripted or fallback.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        self.consumed += 1;
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_over_stream() {
        let bank_a = RngBank::new(2024);
        let bank_b = RngBank::new(2024);

        let a: Vec<f64> = (0..16).map({
            let mut rng = bank_a.for_over(7);
            move |_| rng.next_f64()
        }).collect();
        let b: Vec<f64> = (0..16).map({
            let mut rng = bank_b.for_over(7);
            move |_| rng.next_f64()
        }).collect();

        assert_eq!(a, b, "Same seed and over must give the same draws");
    }

    #[test]
    fn different_overs_get_different_streams() {
        let bank = RngBank::new(2024);
        let mut first = bank.for_over(0);
        let mut second = bank.for_over(1);
        assert_ne!(first.next_f64(), second.next_f64());
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        let mut rng = RngBank::new(99).for_setup();
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "draw {x} outside [0,1)");
        }
    }

    #[test]
    fn scripted_rng_replays_then_falls_back() {
        let mut rng = ScriptedRng::new([0.1, 0.9]).with_fallback(0.5);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.9);
        assert_eq!(rng.next_f64(), 0.5);
        assert_eq!(rng.consumed(), 3);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn index_below_is_bounded() {
        let mut rng = ScriptedRng::new([0.0, 0.5, 0.999_999]);
        assert_eq!(rng.index_below(4), 0);
        assert_eq!(rng.index_below(4), 2);
        assert_eq!(rng.index_below(4), 3);
        assert_eq!(rng.index_below(0), 0);
    }
}
