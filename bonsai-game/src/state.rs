//! Mutable simulation state and its read-only snapshot.
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::outcome::Outcome;
use crate::part::{Part, PartId};
use crate::registry::PartRegistry;
use crate::tracker::BadTimers;

/// Everything a reset throws away. Configuration is held by the session and
/// survives a reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub elapsed_seconds: u64,
    pub outcome: Outcome,
    pub registry: PartRegistry,
    #[serde(default)]
    pub bad_timers: BadTimers,
}

impl Default for EngineState {
    fn default() -> Self {
        Self::initial()
    }
}

impl EngineState {
    /// Fresh run: five healthy seed parts at time zero.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            elapsed_seconds: 0,
            outcome: Outcome::InProgress,
            registry: PartRegistry::seeded(),
            bad_timers: BadTimers::default(),
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        !self.outcome.is_terminal()
    }

    #[must_use]
    pub fn healthy_count(&self) -> usize {
        self.registry.healthy_count()
    }

    #[must_use]
    pub fn bad_count(&self) -> usize {
        self.registry.bad_count()
    }

    #[must_use]
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.registry.get(id)
    }

    /// Copy of the state plus configuration for external readers.
    #[must_use]
    pub fn snapshot(&self, config: &EngineConfig) -> EngineSnapshot {
        EngineSnapshot {
            elapsed_seconds: self.elapsed_seconds,
            outcome: self.outcome,
            parts: self.registry.parts().to_vec(),
            healthy_count: self.registry.healthy_count(),
            bad_count: self.registry.bad_count(),
            bad_timers: self.bad_timers.clone(),
            config: *config,
        }
    }
}

/// Read contract for renderers and tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub elapsed_seconds: u64,
    pub outcome: Outcome,
    pub parts: Vec<Part>,
    pub healthy_count: usize,
    pub bad_count: usize,
    #[serde(default)]
    pub bad_timers: BadTimers,
    pub config: EngineConfig,
}

impl EngineSnapshot {
    /// Parts a renderer should still draw.
    pub fn visible_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|part| !part.is_cut)
    }

    /// Bad, uncut parts, longest-rotting first.
    #[must_use]
    pub fn bad_ids(&self) -> Vec<PartId> {
        self.bad_timers.oldest_first()
    }

    #[must_use]
    pub fn seconds_bad(&self, id: PartId) -> Option<u32> {
        self.bad_timers.seconds_bad(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_seeded_and_running() {
        let state = EngineState::initial();
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.outcome, Outcome::InProgress);
        assert!(state.is_running());
        assert_eq!(state.healthy_count(), 5);
        assert!(state.bad_timers.is_empty());
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let state = EngineState::initial();
        let snapshot = state.snapshot(&EngineConfig::default());
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json["elapsedSeconds"], 0);
        assert_eq!(json["outcome"], "inProgress");
        assert_eq!(json["healthyCount"], 5);
        assert_eq!(json["config"]["winThreshold"], 30);
        assert_eq!(json["parts"].as_array().map(Vec::len), Some(5));

        let restored: EngineSnapshot = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, snapshot);
        assert_eq!(restored.visible_parts().count(), 5);
    }
}
