//! Centralized layout and tuning constants for the bonsai simulation.
//!
//! The seed layout and placement bounds are expressed in the drawing's
//! coordinate space (a 360x420 canvas with the pot at the bottom). Per-player
//! tuning goes through [`crate::EngineConfig`] instead.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_PART_SPAWNED: &str = "log.part.spawned";
pub(crate) const LOG_PART_DECAYED: &str = "log.part.decayed";
pub(crate) const LOG_PART_CUT: &str = "log.part.cut";
pub(crate) const LOG_OUTCOME_WON: &str = "log.outcome.won";
pub(crate) const LOG_OUTCOME_LOST: &str = "log.outcome.lost";
pub(crate) const LOG_SESSION_RESET: &str = "log.session.reset";
pub(crate) const LOG_CONFIG_CHANGED: &str = "log.config.changed";

// Seed layout --------------------------------------------------------------
/// Fixed starting leaf clusters: `(id, x, y)`.
pub const SEED_PARTS: [(u32, f64, f64); 5] = [
    (1, 180.0, 100.0),
    (2, 110.0, 160.0),
    (3, 250.0, 160.0),
    (4, 80.0, 230.0),
    (5, 280.0, 230.0),
];

// Placement ----------------------------------------------------------------
pub const PLACEMENT_X_MIN: f64 = 80.0;
pub const PLACEMENT_X_SPAN: f64 = 200.0;
pub const PLACEMENT_Y_MIN: f64 = 80.0;
pub const PLACEMENT_Y_SPAN: f64 = 220.0;
/// Candidates closer than this on both axes to an existing part are rejected.
pub const PLACEMENT_MIN_SPACING: f64 = 50.0;
pub const PLACEMENT_MAX_ATTEMPTS: u32 = 20;

// Configuration defaults ---------------------------------------------------
pub const DEFAULT_HEALTHY_INTERVAL_SECS: u32 = 1;
pub const DEFAULT_BAD_INTERVAL_SECS: u32 = 2;
pub const DEFAULT_WIN_THRESHOLD: u32 = 30;
pub const DEFAULT_LOSE_THRESHOLD: u32 = 10;
/// Floor applied to every configuration value.
pub const CONFIG_MIN_VALUE: u32 = 1;

// Clock --------------------------------------------------------------------
/// Real-time length of one tick in the reference game.
pub const DEFAULT_TICK_MILLIS: u64 = 1_000;
