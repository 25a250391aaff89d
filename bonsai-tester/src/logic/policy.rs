use std::fmt;

use bonsai_game::{EngineSnapshot, PartId};
use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Cuts chosen by a [`PlayerPolicy`] after one tick.
#[derive(Debug, Clone, Default)]
pub struct PolicyDecision {
    pub cuts: Vec<PartId>,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(cuts: Vec<PartId>, rationale: Option<String>) -> Self {
        Self { cuts, rationale }
    }

    #[must_use]
    pub fn pass() -> Self {
        Self::default()
    }
}

/// Policy interface for automated players.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Decide which parts to cut given the state right after a tick.
    fn pick_cuts(&mut self, snapshot: &EngineSnapshot) -> PolicyDecision;
}

/// Built-in player strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum GameplayStrategy {
    /// Never cuts anything
    Idle,
    /// Cuts every bad part as soon as it appears
    Diligent,
    /// Cuts the single longest-rotting part each tick
    OldestFirst,
    /// Reacts on roughly half the ticks and cuts one random bad part
    Distracted,
}

impl GameplayStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Diligent => "Diligent",
            Self::OldestFirst => "Oldest First",
            Self::Distracted => "Distracted",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Idle => Box::new(IdlePolicy),
            Self::Diligent => Box::new(DiligentPolicy),
            Self::OldestFirst => Box::new(OldestFirstPolicy { budget: 1 }),
            Self::Distracted => Box::new(DistractedPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct IdlePolicy;
struct DiligentPolicy;

struct OldestFirstPolicy {
    budget: usize,
}

struct DistractedPolicy {
    rng: ChaCha20Rng,
    attention: f64,
}

impl DistractedPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            attention: 0.5,
        }
    }
}

impl PlayerPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn pick_cuts(&mut self, _snapshot: &EngineSnapshot) -> PolicyDecision {
        PolicyDecision::pass()
    }
}

impl PlayerPolicy for DiligentPolicy {
    fn name(&self) -> &'static str {
        "Diligent"
    }

    fn pick_cuts(&mut self, snapshot: &EngineSnapshot) -> PolicyDecision {
        let cuts = snapshot.bad_ids();
        let rationale = (!cuts.is_empty()).then(|| format!("clearing {} bad", cuts.len()));
        PolicyDecision::new(cuts, rationale)
    }
}

impl PlayerPolicy for OldestFirstPolicy {
    fn name(&self) -> &'static str {
        "Oldest First"
    }

    fn pick_cuts(&mut self, snapshot: &EngineSnapshot) -> PolicyDecision {
        let cuts: Vec<PartId> = snapshot.bad_ids().into_iter().take(self.budget).collect();
        let rationale = cuts.first().map(|id| {
            format!(
                "oldest {id} bad for {}s",
                snapshot.seconds_bad(*id).unwrap_or(0)
            )
        });
        PolicyDecision::new(cuts, rationale)
    }
}

impl PlayerPolicy for DistractedPolicy {
    fn name(&self) -> &'static str {
        "Distracted"
    }

    fn pick_cuts(&mut self, snapshot: &EngineSnapshot) -> PolicyDecision {
        let bad = snapshot.bad_ids();
        if bad.is_empty() || !self.rng.gen_bool(self.attention) {
            return PolicyDecision::pass();
        }
        let pick = bad[self.rng.gen_range(0..bad.len())];
        PolicyDecision::new(vec![pick], Some(format!("noticed {pick}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonsai_game::{BonsaiSession, EngineConfig};

    fn snapshot_with_bad(count: usize) -> EngineSnapshot {
        let mut session = BonsaiSession::with_config(9, EngineConfig::new(1_000, 1, 1_000, 1_000));
        for _ in 0..count {
            session.tick();
        }
        assert_eq!(session.bad_count(), count);
        session.snapshot()
    }

    #[test]
    fn idle_never_cuts() {
        let snapshot = snapshot_with_bad(3);
        let mut policy = GameplayStrategy::Idle.create_policy(1);
        assert!(policy.pick_cuts(&snapshot).cuts.is_empty());
    }

    #[test]
    fn diligent_cuts_everything_bad() {
        let snapshot = snapshot_with_bad(3);
        let mut policy = GameplayStrategy::Diligent.create_policy(1);
        let decision = policy.pick_cuts(&snapshot);
        assert_eq!(decision.cuts.len(), 3);
        assert!(decision.rationale.is_some());
    }

    #[test]
    fn oldest_first_picks_longest_rotting() {
        let snapshot = snapshot_with_bad(3);
        let mut policy = GameplayStrategy::OldestFirst.create_policy(1);
        let decision = policy.pick_cuts(&snapshot);
        assert_eq!(decision.cuts, vec![snapshot.bad_ids()[0]]);
        let oldest = decision.cuts[0];
        assert_eq!(snapshot.seconds_bad(oldest), Some(3));
    }

    #[test]
    fn distracted_is_deterministic_per_seed() {
        let snapshot = snapshot_with_bad(4);
        let mut a = GameplayStrategy::Distracted.create_policy(77);
        let mut b = GameplayStrategy::Distracted.create_policy(77);
        for _ in 0..16 {
            assert_eq!(a.pick_cuts(&snapshot).cuts, b.pick_cuts(&snapshot).cuts);
        }
    }

    #[test]
    fn labels_are_distinct() {
        let variants = GameplayStrategy::value_variants();
        let mut labels: Vec<_> = variants.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), variants.len());
    }
}
