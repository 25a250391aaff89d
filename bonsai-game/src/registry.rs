//! Authoritative collection of parts.
//!
//! Parts are never removed: a cut part stays in the registry so ids are never
//! handed out twice and renderers can keep excluding it.
use serde::{Deserialize, Serialize};

use crate::constants::SEED_PARTS;
use crate::part::{Part, PartId, Position};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartRegistry {
    parts: Vec<Part>,
}

impl PartRegistry {
    /// Empty registry; the first allocated id is 1.
    #[must_use]
    pub const fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// The five healthy starting clusters.
    #[must_use]
    pub fn seeded() -> Self {
        let parts = SEED_PARTS
            .iter()
            .map(|&(id, x, y)| Part::healthy(PartId(id), Position::new(x, y)))
            .collect();
        Self { parts }
    }

    /// Id the next spawned part will receive: max existing id + 1, or 1.
    #[must_use]
    pub fn next_id(&self) -> PartId {
        self.parts
            .iter()
            .map(|part| part.id)
            .max()
            .map_or(PartId(1), PartId::next)
    }

    /// Append a part. Callers allocate ids through [`Self::next_id`].
    pub(crate) fn insert(&mut self, part: Part) {
        debug_assert!(
            self.get(part.id).is_none(),
            "part id {} already registered",
            part.id
        );
        self.parts.push(part);
    }

    #[must_use]
    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.iter_mut().find(|part| part.id == id)
    }

    /// Every part ever created, in creation order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Positions of every registered part, cut ones included.
    pub fn positions(&self) -> impl Iterator<Item = &Position> + Clone {
        self.parts.iter().map(|part| &part.position)
    }

    /// Ids of the parts eligible to decay, in creation order.
    #[must_use]
    pub fn healthy_ids(&self) -> Vec<PartId> {
        self.parts
            .iter()
            .filter(|part| part.is_healthy())
            .map(|part| part.id)
            .collect()
    }

    #[must_use]
    pub fn healthy_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_healthy()).count()
    }

    #[must_use]
    pub fn bad_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_rotten()).count()
    }

    #[must_use]
    pub fn cut_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_cut).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Non-cut parts in draw order: healthy first so bad ones render on top.
    #[must_use]
    pub fn active_parts(&self) -> Vec<&Part> {
        let healthy = self.parts.iter().filter(|part| part.is_healthy());
        let bad = self.parts.iter().filter(|part| part.is_rotten());
        healthy.chain(bad).collect()
    }

    /// Turn a healthy part bad. Returns false for unknown, cut, or already bad ids.
    pub(crate) fn mark_bad(&mut self, id: PartId) -> bool {
        self.get_mut(id).is_some_and(Part::decay)
    }

    /// Cut a part. Returns false for unknown or already cut ids.
    pub(crate) fn cut(&mut self, id: PartId) -> bool {
        self.get_mut(id).is_some_and(Part::cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_registry_matches_layout() {
        let registry = PartRegistry::seeded();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.healthy_count(), 5);
        assert_eq!(registry.bad_count(), 0);
        assert_eq!(registry.next_id(), PartId(6));
        let first = registry.get(PartId(1)).expect("seed part 1");
        assert_eq!(first.position, Position::new(180.0, 100.0));
    }

    #[test]
    fn empty_registry_starts_ids_at_one() {
        assert_eq!(PartRegistry::empty().next_id(), PartId(1));
    }

    #[test]
    fn next_id_uses_max_even_when_parts_are_cut() {
        let mut registry = PartRegistry::seeded();
        assert!(registry.cut(PartId(5)));
        assert_eq!(registry.next_id(), PartId(6));
        registry.insert(Part::healthy(PartId(6), Position::new(0.0, 0.0)));
        assert!(registry.cut(PartId(6)));
        assert_eq!(registry.next_id(), PartId(7));
    }

    #[test]
    fn counts_exclude_cut_parts() {
        let mut registry = PartRegistry::seeded();
        assert!(registry.mark_bad(PartId(2)));
        assert!(registry.mark_bad(PartId(3)));
        assert!(registry.cut(PartId(3)));
        assert!(registry.cut(PartId(4)));

        assert_eq!(registry.bad_count(), 1);
        assert_eq!(registry.healthy_count(), 2);
        assert_eq!(registry.cut_count(), 2);
        assert_eq!(registry.healthy_ids(), vec![PartId(1), PartId(5)]);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut registry = PartRegistry::seeded();
        assert!(!registry.cut(PartId(99)));
        assert!(!registry.mark_bad(PartId(99)));
        assert_eq!(registry, PartRegistry::seeded());
    }

    #[test]
    fn active_parts_put_bad_leaves_last() {
        let mut registry = PartRegistry::seeded();
        registry.mark_bad(PartId(1));
        registry.cut(PartId(2));
        let order: Vec<u32> = registry.active_parts().iter().map(|p| p.id.get()).collect();
        assert_eq!(order, vec![3, 4, 5, 1]);
    }
}
