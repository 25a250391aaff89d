//! Bonsai Game Engine
//!
//! Platform-agnostic simulation core for the bonsai cutting game: leaves spawn
//! healthy on a timer, turn bad on another timer, and the player cuts bad ones
//! before they pile up. This crate provides the tick engine, scheduler rules,
//! outcome evaluation and player commands without any rendering.

pub mod clock;
pub mod config;
pub mod constants;
pub mod event;
pub mod numbers;
pub mod outcome;
pub mod part;
pub mod placement;
pub mod registry;
pub mod rng;
pub mod schedule;
pub mod session;
pub mod state;
pub mod tracker;

// Re-export commonly used types
pub use clock::Clock;
#[cfg(feature = "async")]
pub use clock::realtime::{ClockCommand, drive};
pub use config::{ConfigError, ConfigField, EngineConfig, SettingValue};
pub use event::{EngineEvent, EventList, TickReport};
pub use outcome::Outcome;
pub use part::{Part, PartId, Position};
pub use placement::{Placement, PlacementBounds};
pub use registry::PartRegistry;
pub use rng::{CountingRng, RngBundle};
pub use session::BonsaiSession;
pub use state::{EngineSnapshot, EngineState};
pub use tracker::BadTimers;
