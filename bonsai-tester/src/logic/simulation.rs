use bonsai_game::{BonsaiSession, EngineConfig, EngineSnapshot, Outcome, PartId};
use serde::Serialize;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};

pub const DEFAULT_MAX_TICKS: u64 = 300;

/// Configuration for a simulation run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub engine: EngineConfig,
    pub max_ticks: u64,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            engine: EngineConfig::default(),
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    #[must_use]
    pub const fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

/// Cuts applied after one tick.
#[derive(Debug, Clone, Serialize)]
pub struct CutRecord {
    pub tick: u64,
    pub ids: Vec<PartId>,
    pub policy_name: String,
    pub rationale: Option<String>,
}

/// Per-run counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationMetrics {
    pub spawned: usize,
    pub decayed: usize,
    pub cuts: usize,
    pub peak_bad: usize,
    pub cut_log: Vec<CutRecord>,
}

/// Everything a scenario expectation can look at after a run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub outcome: Outcome,
    pub ticks: u64,
    pub finished: bool,
    pub final_snapshot: EngineSnapshot,
    pub metrics: SimulationMetrics,
    pub violations: Vec<String>,
}

/// Deterministic harness pairing a session with a scripted player.
pub struct SimulationSession {
    session: BonsaiSession,
    policy: Box<dyn PlayerPolicy + Send>,
    config: SimulationConfig,
    metrics: SimulationMetrics,
    violations: Vec<String>,
}

impl SimulationSession {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            session: BonsaiSession::with_config(config.seed, config.engine),
            policy: config.strategy.create_policy(config.seed),
            config,
            metrics: SimulationMetrics::default(),
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &BonsaiSession {
        &self.session
    }

    /// Advance one tick and let the policy react. Returns `false` once the
    /// run has ended.
    pub fn step(&mut self) -> bool {
        let before = self.session.snapshot();
        let report = self.session.tick();
        if !report.advanced {
            return false;
        }
        if report.spawned().is_some() {
            self.metrics.spawned += 1;
        }
        if report.decayed().is_some() {
            self.metrics.decayed += 1;
        }
        self.metrics.peak_bad = self.metrics.peak_bad.max(self.session.bad_count());
        self.check_tick(&before, report.elapsed_seconds);

        let decision = self.policy.pick_cuts(&self.session.snapshot());
        self.apply(report.elapsed_seconds, decision);
        self.check_state(report.elapsed_seconds);
        !self.session.outcome().is_terminal()
    }

    fn apply(&mut self, tick: u64, decision: PolicyDecision) {
        if decision.cuts.is_empty() {
            return;
        }
        let before = self.session.outcome();
        for id in &decision.cuts {
            self.session.cut(*id);
        }
        // A cut may finish a run with a win, but never reopens or loses one.
        let after = self.session.outcome();
        if after != before && (before.is_terminal() || after == Outcome::Lost) {
            self.violations
                .push(format!("t={tick}: cutting moved the outcome from {before} to {after}"));
        }
        self.metrics.cuts += decision.cuts.len();
        self.metrics.cut_log.push(CutRecord {
            tick,
            ids: decision.cuts,
            policy_name: self.policy.name().to_string(),
            rationale: decision.rationale,
        });
    }

    fn check_tick(&mut self, before: &EngineSnapshot, tick: u64) {
        if tick != before.elapsed_seconds + 1 {
            self.violations.push(format!(
                "t={tick}: clock jumped from {}",
                before.elapsed_seconds
            ));
        }
        let grew = self.session.parts().len() - before.parts.len();
        if grew > 1 {
            self.violations
                .push(format!("t={tick}: {grew} parts spawned in one tick"));
        }
        for (old, new) in before.parts.iter().zip(self.session.parts()) {
            if old.id != new.id || old.position != new.position {
                self.violations
                    .push(format!("t={tick}: part {} moved or was replaced", old.id));
            }
            if old.is_bad && !new.is_bad {
                self.violations
                    .push(format!("t={tick}: part {} recovered from bad", old.id));
            }
        }
    }

    fn check_state(&mut self, tick: u64) {
        let cfg = self.session.config();
        let bad = self.session.bad_count();
        let healthy = self.session.healthy_count();
        for part in self.session.parts() {
            if part.is_cut && part.is_bad {
                self.violations
                    .push(format!("t={tick}: part {} is both cut and bad", part.id));
            }
        }
        let lose = cfg.lose_threshold() as usize;
        let win = cfg.win_threshold() as usize;
        let decided = bad >= lose || (healthy >= win && bad == 0);
        if self.session.outcome() == Outcome::InProgress && decided {
            self.violations.push(format!(
                "t={tick}: thresholds met (healthy {healthy}, bad {bad}) but still in progress"
            ));
        }
    }

    #[must_use]
    pub fn finish(self) -> SimulationSummary {
        SimulationSummary {
            seed: self.config.seed,
            strategy: self.config.strategy,
            outcome: self.session.outcome(),
            ticks: self.session.elapsed_seconds(),
            finished: self.session.outcome().is_terminal(),
            final_snapshot: self.session.snapshot(),
            metrics: self.metrics,
            violations: self.violations,
        }
    }
}

/// Run a full session until it ends or `max_ticks` elapse.
#[must_use]
pub fn run_simulation(config: SimulationConfig) -> SimulationSummary {
    let mut sim = SimulationSession::new(config);
    while sim.session().elapsed_seconds() < config.max_ticks && sim.step() {}
    let summary = sim.finish();
    log::debug!(
        "seed {} strategy {} finished {} after {} ticks ({} cuts)",
        summary.seed,
        summary.strategy,
        summary.outcome,
        summary.ticks,
        summary.metrics.cuts
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_run_loses_at_tick_twenty() {
        let summary = run_simulation(SimulationConfig::new(GameplayStrategy::Idle, 1));
        assert_eq!(summary.outcome, Outcome::Lost);
        assert_eq!(summary.ticks, 20);
        assert_eq!(summary.metrics.decayed, 10);
        assert_eq!(summary.metrics.spawned, 20);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
    }

    #[test]
    fn diligent_run_wins() {
        let summary = run_simulation(SimulationConfig::new(GameplayStrategy::Diligent, 3));
        assert_eq!(summary.outcome, Outcome::Won);
        assert_eq!(summary.ticks, 49);
        assert_eq!(summary.metrics.cuts, summary.metrics.decayed);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
    }

    #[test]
    fn tick_cap_stops_unfinished_runs() {
        let engine = EngineConfig::new(1, 5, 1_000, 1_000);
        let summary = run_simulation(
            SimulationConfig::new(GameplayStrategy::Idle, 4)
                .with_engine(engine)
                .with_max_ticks(12),
        );
        assert_eq!(summary.ticks, 12);
        assert!(!summary.finished);
        assert_eq!(summary.outcome, Outcome::InProgress);
        assert_eq!(summary.final_snapshot.parts.len(), 17);
    }

    #[test]
    fn healthy_threshold_with_bad_parts_stays_in_progress_until_cut() {
        let engine = EngineConfig::new(1, 3, 8, 10);
        let mut sim =
            SimulationSession::new(SimulationConfig::new(GameplayStrategy::Idle, 6).with_engine(engine));
        for _ in 0..4 {
            assert!(sim.step());
        }
        assert_eq!(sim.session().healthy_count(), 8);
        assert_eq!(sim.session().bad_count(), 1);
        assert_eq!(sim.session().outcome(), Outcome::InProgress);

        let bad = sim.session().bad_ids();
        sim.apply(4, PolicyDecision::new(bad, Some("clear last bad".to_string())));
        sim.check_state(4);

        let summary = sim.finish();
        assert_eq!(summary.outcome, Outcome::Won);
        assert_eq!(summary.metrics.cuts, 1);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
    }

    #[test]
    fn distracted_runs_finish_without_violations() {
        for seed in 0..50 {
            let summary = run_simulation(SimulationConfig::new(GameplayStrategy::Distracted, seed));
            assert!(
                summary.violations.is_empty(),
                "seed {seed}: {:?}",
                summary.violations
            );
            assert!(summary.finished, "seed {seed} unfinished after {} ticks", summary.ticks);
        }
    }
}
