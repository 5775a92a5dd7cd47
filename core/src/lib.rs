//! T20 innings simulation core: probability model, outcome resolver and
//! the ball/over state machine.

pub mod buckets;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod innings;
pub mod narrative;
pub mod outcome;
pub mod player;
pub mod probability;
pub mod resolver;
pub mod rng;
pub mod selection;
pub mod tactics;
pub mod types;
