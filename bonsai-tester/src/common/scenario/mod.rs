pub mod catalog;

use anyhow::Result;
use bonsai_game::{EngineConfig, Outcome};

use crate::logic::simulation::{DEFAULT_MAX_TICKS, SimulationSummary};
use crate::logic::{GameplayStrategy, SimulationPlan};
use catalog::find_catalog_scenario;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.plan = self.plan.with_max_ticks(max_ticks);
        self
    }
}

/// Player and engine setup for the free-form `policy` scenario.
#[derive(Debug, Clone, Copy)]
pub struct PolicySetup {
    pub strategy: GameplayStrategy,
    pub engine: EngineConfig,
    /// Tick cap override; applies to every scenario when set.
    pub max_ticks: Option<u64>,
}

impl Default for PolicySetup {
    fn default() -> Self {
        Self {
            strategy: GameplayStrategy::Diligent,
            engine: EngineConfig::default(),
            max_ticks: None,
        }
    }
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(summary.ticks > 0, "Clock should advance at least once");
    anyhow::ensure!(summary.metrics.spawned > 0, "Tree should grow");
    Ok(())
}

fn idle_loss_expectation(summary: &SimulationSummary) -> Result<()> {
    let cfg = summary.final_snapshot.config;
    let expected = u64::from(cfg.lose_threshold()) * u64::from(cfg.bad_interval_seconds());
    anyhow::ensure!(
        summary.outcome == Outcome::Lost,
        "Idle player should lose, got {}",
        summary.outcome
    );
    anyhow::ensure!(
        summary.ticks == expected,
        "Loss expected at t={expected}, got t={}",
        summary.ticks
    );
    anyhow::ensure!(
        summary.final_snapshot.bad_count == cfg.lose_threshold() as usize,
        "Loss should land exactly on the threshold"
    );
    Ok(())
}

fn winning_expectation(summary: &SimulationSummary) -> Result<()> {
    let cfg = summary.final_snapshot.config;
    anyhow::ensure!(
        summary.outcome == Outcome::Won,
        "Player should win, got {} after {} ticks",
        summary.outcome,
        summary.ticks
    );
    anyhow::ensure!(
        summary.final_snapshot.healthy_count == cfg.win_threshold() as usize,
        "Win should land exactly on the threshold"
    );
    anyhow::ensure!(
        summary.metrics.peak_bad < cfg.lose_threshold() as usize,
        "Bad parts should never reach the loss threshold"
    );
    Ok(())
}

fn diligent_timing_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        summary.ticks == 49,
        "Diligent player should win at t=49, got t={}",
        summary.ticks
    );
    anyhow::ensure!(
        summary.final_snapshot.bad_count == 0,
        "Nothing should be left rotting"
    );
    Ok(())
}

fn finishes_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        summary.finished,
        "Run should end within {} ticks",
        summary.ticks
    );
    Ok(())
}

fn policy_scenario(setup: &PolicySetup) -> TestScenario {
    TestScenario::simulation(
        format!("Policy Run ({})", setup.strategy),
        SimulationPlan::new(setup.strategy)
            .with_engine(setup.engine)
            .with_max_ticks(setup.max_ticks.unwrap_or(DEFAULT_MAX_TICKS)),
    )
}

fn strategy_scenario(
    name: &str,
    strategy: GameplayStrategy,
    expectation: fn(&SimulationSummary) -> Result<()>,
) -> TestScenario {
    TestScenario::simulation(
        name,
        SimulationPlan::new(strategy).with_expectation(expectation),
    )
}

pub fn get_scenario(name: &str, setup: &PolicySetup) -> Option<TestScenario> {
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => TestScenario::simulation(
            "Smoke Test",
            SimulationPlan::new(GameplayStrategy::Diligent)
                .with_max_ticks(60)
                .with_expectation(smoke_expectation),
        ),
        "idle-loss" | "idle" => strategy_scenario(
            "Idle Player Loses",
            GameplayStrategy::Idle,
            idle_loss_expectation,
        ),
        "diligent-win" | "diligent" => TestScenario::simulation(
            "Diligent Player Wins",
            SimulationPlan::new(GameplayStrategy::Diligent)
                .with_expectation(winning_expectation)
                .with_expectation(diligent_timing_expectation),
        ),
        "oldest-first" | "oldest" => strategy_scenario(
            "Oldest First Keeps Up",
            GameplayStrategy::OldestFirst,
            winning_expectation,
        ),
        "distracted" => strategy_scenario(
            "Distracted Player Finishes",
            GameplayStrategy::Distracted,
            finishes_expectation,
        ),
        "policy" | "custom" => return Some(policy_scenario(setup)),

        // Engine rule checks
        "reset-recovery" | "reset" => find_catalog_scenario("Reset After Loss")?,
        "config-coercion" | "config" => find_catalog_scenario("Config Coercion")?,
        "deterministic-replay" | "deterministic" => {
            find_catalog_scenario("Deterministic Replay")?
        }
        "terminal-freeze" | "terminal" => find_catalog_scenario("Terminal State Freeze")?,
        "placement-window" | "placement" => find_catalog_scenario("Placement Window")?,
        "cut-rules" | "cuts" => find_catalog_scenario("Cut Rules")?,
        _ => return None,
    };
    Some(match setup.max_ticks {
        Some(max_ticks) => scenario.with_max_ticks(max_ticks),
        None => scenario,
    })
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("idle-loss", "Idle Player Loses"),
        ("diligent-win", "Diligent Player Wins"),
        ("oldest-first", "Oldest First Keeps Up"),
        ("distracted", "Distracted Player Finishes"),
        ("policy", "Policy Run (--policy / --config)"),
        ("reset-recovery", "Reset After Loss"),
        ("config-coercion", "Config Coercion"),
        ("deterministic-replay", "Deterministic Replay"),
        ("terminal-freeze", "Terminal State Freeze"),
        ("placement-window", "Placement Window"),
        ("cut-rules", "Cut Rules"),
    ]
}

/// Expand `all` into every registered scenario key.
pub fn expand_scenarios(requested: Vec<String>) -> Vec<String> {
    let mut scenarios = requested;
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        scenarios.extend(
            list_scenarios()
                .into_iter()
                .map(|(key, _)| key.to_string())
                .filter(|key| key != "policy"),
        );
    }
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        let setup = PolicySetup::default();
        for (key, description) in list_scenarios() {
            let scenario = get_scenario(key, &setup)
                .unwrap_or_else(|| panic!("scenario {key} should resolve"));
            if key != "policy" {
                assert_eq!(scenario.name, description);
            }
        }
    }

    #[test]
    fn unknown_scenario_is_none() {
        assert!(get_scenario("weather", &PolicySetup::default()).is_none());
    }

    #[test]
    fn policy_scenario_uses_cli_setup() {
        let setup = PolicySetup {
            strategy: GameplayStrategy::Idle,
            engine: EngineConfig::new(2, 3, 40, 6),
            max_ticks: Some(25),
        };
        let scenario = get_scenario("custom", &setup).unwrap();
        assert_eq!(scenario.plan.strategy, GameplayStrategy::Idle);
        assert_eq!(scenario.plan.engine, setup.engine);
        assert_eq!(scenario.plan.max_ticks, 25);
        assert!(scenario.plan.expectations.is_empty());
    }

    #[test]
    fn all_expands_without_duplicating_policy() {
        let expanded = expand_scenarios(vec!["all".into()]);
        assert_eq!(expanded.len(), list_scenarios().len() - 1);
        assert!(!expanded.iter().any(|s| s == "policy" || s == "all"));
    }
}
