//! Per-part "seconds continuously bad" bookkeeping.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::part::PartId;
use crate::registry::PartRegistry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadTimers {
    seconds: BTreeMap<PartId, u32>,
}

impl BadTimers {
    /// Advance one second: every bad, uncut part ages by one, everything else
    /// is dropped.
    pub fn tick(&mut self, registry: &PartRegistry) {
        let previous = std::mem::take(&mut self.seconds);
        self.seconds = registry
            .iter()
            .filter(|part| part.is_rotten())
            .map(|part| {
                let prior = previous.get(&part.id).copied().unwrap_or(0);
                (part.id, prior.saturating_add(1))
            })
            .collect();
    }

    /// Drop the timer for a part that left the bad state.
    pub fn forget(&mut self, id: PartId) {
        self.seconds.remove(&id);
    }

    pub fn clear(&mut self) {
        self.seconds.clear();
    }

    /// Seconds `id` has been continuously bad, if it is bad.
    #[must_use]
    pub fn seconds_bad(&self, id: PartId) -> Option<u32> {
        self.seconds.get(&id).copied()
    }

    /// Longest-running bad part.
    #[must_use]
    pub fn oldest(&self) -> Option<(PartId, u32)> {
        self.seconds
            .iter()
            .max_by_key(|(id, secs)| (**secs, std::cmp::Reverse(**id)))
            .map(|(id, secs)| (*id, *secs))
    }

    /// Tracked ids ordered by time spent bad, longest first; ties go to the
    /// lowest id.
    #[must_use]
    pub fn oldest_first(&self) -> Vec<PartId> {
        let mut ids: Vec<(PartId, u32)> = self.seconds.iter().map(|(id, s)| (*id, *s)).collect();
        ids.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ids.into_iter().map(|(id, _)| id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_age_and_drop_healed_parts() {
        let mut registry = PartRegistry::seeded();
        let mut timers = BadTimers::default();

        registry.mark_bad(PartId(2));
        timers.tick(&registry);
        timers.tick(&registry);
        registry.mark_bad(PartId(4));
        timers.tick(&registry);

        assert_eq!(timers.seconds_bad(PartId(2)), Some(3));
        assert_eq!(timers.seconds_bad(PartId(4)), Some(1));
        assert_eq!(timers.oldest(), Some((PartId(2), 3)));

        registry.cut(PartId(2));
        timers.tick(&registry);
        assert_eq!(timers.seconds_bad(PartId(2)), None);
        assert_eq!(timers.seconds_bad(PartId(4)), Some(2));
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn oldest_breaks_ties_by_lowest_id() {
        let mut registry = PartRegistry::seeded();
        registry.mark_bad(PartId(3));
        registry.mark_bad(PartId(1));
        let mut timers = BadTimers::default();
        timers.tick(&registry);
        assert_eq!(timers.oldest(), Some((PartId(1), 1)));
        timers.forget(PartId(1));
        assert_eq!(timers.oldest(), Some((PartId(3), 1)));
        timers.clear();
        assert!(timers.is_empty());
    }

    #[test]
    fn oldest_first_orders_by_age_then_id() {
        let mut registry = PartRegistry::seeded();
        registry.mark_bad(PartId(4));
        let mut timers = BadTimers::default();
        timers.tick(&registry);
        registry.mark_bad(PartId(2));
        registry.mark_bad(PartId(5));
        timers.tick(&registry);
        assert_eq!(timers.oldest_first(), vec![PartId(4), PartId(2), PartId(5)]);
    }
}
