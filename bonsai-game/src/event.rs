//! Structured events emitted by the engine.
//!
//! Renderers react to these instead of diffing snapshots. Each event carries
//! a stable log key as a presentation hint; the variant stays the mechanical
//! descriptor.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::ConfigField;
use crate::constants::{
    LOG_CONFIG_CHANGED, LOG_OUTCOME_LOST, LOG_OUTCOME_WON, LOG_PART_CUT, LOG_PART_DECAYED,
    LOG_PART_SPAWNED, LOG_SESSION_RESET,
};
use crate::outcome::Outcome;
use crate::part::{PartId, Position};

/// Events produced by one tick; most ticks emit at most three.
pub type EventList = SmallVec<[EngineEvent; 4]>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    Spawned { id: PartId, position: Position },
    Decayed { id: PartId },
    Cut { id: PartId },
    OutcomeReached { outcome: Outcome },
    Reset,
    Configured { field: ConfigField, value: u32 },
}

impl EngineEvent {
    /// i18n/log key for presentation layers.
    #[must_use]
    pub const fn log_key(&self) -> &'static str {
        match self {
            Self::Spawned { .. } => LOG_PART_SPAWNED,
            Self::Decayed { .. } => LOG_PART_DECAYED,
            Self::Cut { .. } => LOG_PART_CUT,
            Self::OutcomeReached {
                outcome: Outcome::Lost,
            } => LOG_OUTCOME_LOST,
            Self::OutcomeReached { .. } => LOG_OUTCOME_WON,
            Self::Reset => LOG_SESSION_RESET,
            Self::Configured { .. } => LOG_CONFIG_CHANGED,
        }
    }
}

/// Result returned by a clock tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// False when the clock was stopped and nothing happened.
    pub advanced: bool,
    pub elapsed_seconds: u64,
    pub outcome: Outcome,
    #[serde(default)]
    pub events: EventList,
}

impl TickReport {
    pub(crate) fn idle(elapsed_seconds: u64, outcome: Outcome) -> Self {
        Self {
            advanced: false,
            elapsed_seconds,
            outcome,
            events: EventList::new(),
        }
    }

    /// Part spawned on this tick, if any.
    #[must_use]
    pub fn spawned(&self) -> Option<PartId> {
        self.events.iter().find_map(|event| match event {
            EngineEvent::Spawned { id, .. } => Some(*id),
            _ => None,
        })
    }

    /// Part that turned bad on this tick, if any.
    #[must_use]
    pub fn decayed(&self) -> Option<PartId> {
        self.events.iter().find_map(|event| match event {
            EngineEvent::Decayed { id } => Some(*id),
            _ => None,
        })
    }

    /// Whether this tick moved the run into a terminal outcome.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, EngineEvent::OutcomeReached { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = EngineEvent::Decayed { id: PartId(4) };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["kind"], "decayed");
        assert_eq!(json["id"], 4);
        assert_eq!(event.log_key(), "log.part.decayed");
    }

    #[test]
    fn outcome_events_pick_matching_key() {
        let lost = EngineEvent::OutcomeReached {
            outcome: Outcome::Lost,
        };
        let won = EngineEvent::OutcomeReached {
            outcome: Outcome::Won,
        };
        assert_eq!(lost.log_key(), "log.outcome.lost");
        assert_eq!(won.log_key(), "log.outcome.won");
    }

    #[test]
    fn report_accessors_find_events() {
        let mut report = TickReport::idle(3, Outcome::InProgress);
        assert!(!report.finished());
        report.events.push(EngineEvent::Spawned {
            id: PartId(9),
            position: Position::new(1.0, 1.0),
        });
        report.events.push(EngineEvent::Decayed { id: PartId(2) });
        assert_eq!(report.spawned(), Some(PartId(9)));
        assert_eq!(report.decayed(), Some(PartId(2)));
    }
}
