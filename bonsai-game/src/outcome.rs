//! Win/lose evaluation.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EngineConfig;
use crate::registry::PartRegistry;

/// Status of a simulation run. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// Loss: at least `lose_threshold` bad, uncut parts.
#[must_use]
pub fn is_lost(registry: &PartRegistry, cfg: &EngineConfig) -> bool {
    registry.bad_count() >= cfg.lose_threshold() as usize
}

/// Win: at least `win_threshold` healthy parts and no bad ones.
#[must_use]
pub fn is_won(registry: &PartRegistry, cfg: &EngineConfig) -> bool {
    registry.bad_count() == 0 && registry.healthy_count() >= cfg.win_threshold() as usize
}

/// Outcome implied by the registry alone. Loss takes precedence.
#[must_use]
pub fn evaluate(registry: &PartRegistry, cfg: &EngineConfig) -> Outcome {
    if is_lost(registry, cfg) {
        Outcome::Lost
    } else if is_won(registry, cfg) {
        Outcome::Won
    } else {
        Outcome::InProgress
    }
}

/// Advance `current` with a fresh evaluation. Terminal outcomes are sticky.
#[must_use]
pub fn advance(current: Outcome, registry: &PartRegistry, cfg: &EngineConfig) -> Outcome {
    if current.is_terminal() {
        return current;
    }
    evaluate(registry, cfg)
}
