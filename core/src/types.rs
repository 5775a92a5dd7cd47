//! Shared primitive types and the fixed laws of a T20 innings.

/// A stable, unique identifier for a player.
pub type PlayerId = String;

/// A stable identifier for a team.
pub type TeamId = String;

/// Overs in a full T20 innings.
pub const TOTAL_OVERS: u32 = 20;

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Wickets that end an innings.
pub const MAX_WICKETS: u32 = 10;

/// Legal deliveries in a full innings.
pub const INNINGS_BALLS: u32 = TOTAL_OVERS * BALLS_PER_OVER;
