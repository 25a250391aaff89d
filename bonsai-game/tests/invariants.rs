use std::collections::HashSet;

use bonsai_game::{BonsaiSession, ConfigField, EngineConfig, Outcome, PartId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random walk over ticks and commands, checking invariants after every step.
fn fuzz_session(seed: u64, steps: usize) {
    let mut driver = ChaCha8Rng::seed_from_u64(seed ^ 0x5EED);
    let cfg = EngineConfig::new(
        driver.gen_range(1..4),
        driver.gen_range(1..4),
        driver.gen_range(8..40),
        driver.gen_range(3..12),
    );
    let mut session = BonsaiSession::with_config(seed, cfg);
    let mut cut_ids: HashSet<PartId> = HashSet::new();
    let mut last_max_id = session.parts().iter().map(|p| p.id).max();

    for step in 0..steps {
        let before = session.snapshot();
        let roll: u32 = driver.gen_range(0..100);
        match roll {
            0..=59 => {
                let report = session.tick();
                if before.outcome.is_terminal() {
                    assert!(!report.advanced, "seed {seed} step {step}: terminal tick advanced");
                    assert_eq!(session.snapshot(), before);
                } else {
                    assert_eq!(report.elapsed_seconds, before.elapsed_seconds + 1);
                }
            }
            60..=89 => {
                let max_id = session.parts().iter().map(|p| p.id.get()).max().unwrap_or(1);
                let id = PartId(driver.gen_range(1..=max_id + 2));
                session.cut(id);
                if before.outcome.is_terminal() {
                    assert_eq!(session.outcome(), before.outcome);
                }
            }
            90..=96 => {
                let field = ConfigField::ALL[driver.gen_range(0..4)];
                let value: i64 = driver.gen_range(-3..15);
                session.configure(field, value);
                assert!(session.config().get(field) >= 1);
                if before.outcome.is_terminal() {
                    assert_eq!(session.outcome(), before.outcome);
                }
            }
            _ => {
                session.reset();
                cut_ids.clear();
                last_max_id = None;
                assert_eq!(session.elapsed_seconds(), 0);
                assert_eq!(session.parts().len(), 5);
            }
        }

        let parts = session.parts();
        // Ids strictly increase in creation order and never repeat.
        assert!(
            parts.windows(2).all(|w| w[0].id < w[1].id),
            "seed {seed} step {step}: ids out of order"
        );
        let max_id = parts.iter().map(|p| p.id).max();
        if let (Some(prev), Some(now)) = (last_max_id, max_id) {
            assert!(now >= prev);
        }
        last_max_id = max_id;

        for part in parts {
            if part.is_cut {
                assert!(!part.is_bad, "seed {seed} step {step}: cut part {} is bad", part.id);
            }
            if cut_ids.contains(&part.id) {
                assert!(part.is_cut, "seed {seed} step {step}: part {} uncut", part.id);
            }
        }
        cut_ids.extend(parts.iter().filter(|p| p.is_cut).map(|p| p.id));

        // Terminal outcomes only ever move back through reset.
        if before.outcome.is_terminal() && session.elapsed_seconds() != 0 {
            assert_eq!(session.outcome(), before.outcome);
        }
        match session.outcome() {
            Outcome::Lost => assert!(
                session.bad_count() >= session.config().lose_threshold() as usize
                    || before.outcome == Outcome::Lost
            ),
            Outcome::Won | Outcome::InProgress => {}
        }
    }
}

#[test]
fn random_walks_preserve_invariants() {
    for seed in 0..64 {
        fuzz_session(seed, 400);
    }
}

#[test]
fn positions_never_change_after_spawn() {
    let mut session = BonsaiSession::new(404);
    let mut seen = Vec::new();
    for _ in 0..60 {
        session.tick();
        for id in session.bad_ids().into_iter().take(1) {
            session.cut(id);
        }
        for (idx, part) in session.parts().iter().enumerate() {
            if let Some(&(id, pos)) = seen.get(idx) {
                assert_eq!(part.id, id);
                assert_eq!(part.position, pos);
            } else {
                seen.push((part.id, part.position));
            }
        }
    }
}

#[test]
fn spawned_parts_land_inside_placement_window() {
    let bounds = bonsai_game::PlacementBounds::default();
    let mut session = BonsaiSession::with_config(77, EngineConfig::new(1, 1_000, 1_000, 1_000));
    for _ in 0..80 {
        session.tick();
    }
    assert_eq!(session.parts().len(), 85);
    for part in session.parts().iter().skip(5) {
        assert!(bounds.contains(&part.position), "{} outside window", part.id);
    }
}

#[test]
fn decay_selection_covers_all_healthy_parts() {
    let mut picked = HashSet::new();
    for seed in 0..200 {
        let mut session = BonsaiSession::with_config(seed, EngineConfig::new(1_000, 1, 1_000, 1_000));
        let report = session.tick();
        picked.insert(report.decayed().expect("decay at t=1"));
    }
    let expected: HashSet<PartId> = (1..=5).map(PartId).collect();
    assert_eq!(picked, expected);
}
