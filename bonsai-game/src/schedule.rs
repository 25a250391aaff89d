//! Scheduler rules evaluated once per tick.
//!
//! Both rules are pure with respect to time: they only look at the elapsed
//! counter, the configured interval and the registry they are handed.
use rand::Rng;

use crate::part::{Part, PartId};
use crate::placement::{PlacementBounds, place};
use crate::registry::PartRegistry;

/// Whether a periodic rule with `interval` fires at `elapsed`.
///
/// Never fires at time zero. A zero interval is treated as 1.
#[must_use]
pub const fn is_due(elapsed: u64, interval: u32) -> bool {
    let interval = if interval == 0 { 1 } else { interval as u64 };
    elapsed > 0 && elapsed % interval == 0
}

/// Build the part a spawn would add, without inserting it.
pub fn plan_spawn<R: Rng + ?Sized>(
    registry: &PartRegistry,
    bounds: &PlacementBounds,
    rng: &mut R,
) -> Part {
    let id = registry.next_id();
    let placement = place(registry.positions(), bounds, rng);
    if !placement.clear {
        log::debug!(
            "part {id} placed crowded after {} attempts",
            placement.attempts
        );
    }
    Part::healthy(id, placement.position)
}

/// Pick one of `candidates` uniformly.
pub fn choose_decay<R: Rng + ?Sized>(candidates: &[PartId], rng: &mut R) -> Option<PartId> {
    if candidates.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..candidates.len());
    candidates.get(idx).copied()
}

/// Mark one uniformly chosen healthy part bad. No-op on a tree with no healthy parts.
pub fn apply_decay<R: Rng + ?Sized>(registry: &mut PartRegistry, rng: &mut R) -> Option<PartId> {
    let candidates = registry.healthy_ids();
    let chosen = choose_decay(&candidates, rng)?;
    registry.mark_bad(chosen).then_some(chosen)
}
