use anyhow::{Context, Result, anyhow};

use crate::common::scenario::TestScenario;
use crate::logic::simulation::{SimulationConfig, SimulationSummary, run_simulation};
use crate::logic::{GameplayStrategy, SimulationPlan};
use bonsai_game::{
    BonsaiSession, ConfigField, EngineConfig, EngineEvent, Outcome, PartId, PlacementBounds,
};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::simulation(
            "Reset After Loss",
            base_plan().with_expectation(reset_after_loss_expectation),
        ),
        TestScenario::simulation(
            "Config Coercion",
            base_plan().with_expectation(config_coercion_expectation),
        ),
        TestScenario::simulation(
            "Deterministic Replay",
            SimulationPlan::new(GameplayStrategy::Distracted)
                .with_max_ticks(80)
                .with_expectation(deterministic_replay_expectation),
        ),
        TestScenario::simulation(
            "Terminal State Freeze",
            base_plan().with_expectation(terminal_freeze_expectation),
        ),
        TestScenario::simulation(
            "Placement Window",
            base_plan().with_expectation(placement_window_expectation),
        ),
        TestScenario::simulation(
            "Cut Rules",
            base_plan().with_expectation(cut_rules_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(name: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

fn base_plan() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Idle).with_max_ticks(0)
}

fn tick_until_terminal(session: &mut BonsaiSession, limit: u64) -> Result<Outcome> {
    while !session.outcome().is_terminal() {
        anyhow::ensure!(
            session.elapsed_seconds() < limit,
            "No outcome within {limit} ticks"
        );
        session.tick();
    }
    Ok(session.outcome())
}

fn reset_after_loss_expectation(summary: &SimulationSummary) -> Result<()> {
    let cfg = EngineConfig::new(3, 1, 12, 2);
    let mut session = BonsaiSession::with_config(summary.seed, cfg);
    let outcome = tick_until_terminal(&mut session, 50)?;
    anyhow::ensure!(outcome == Outcome::Lost, "Expected a loss, got {outcome}");
    anyhow::ensure!(!session.is_running(), "Clock should stop after a loss");

    let events = session.reset();
    anyhow::ensure!(
        events.as_slice() == [EngineEvent::Reset],
        "Reset should emit exactly one event, got {events:?}"
    );
    anyhow::ensure!(session.elapsed_seconds() == 0, "Elapsed should restart at 0");
    anyhow::ensure!(
        session.outcome() == Outcome::InProgress,
        "Outcome should return to in progress"
    );
    anyhow::ensure!(
        session.parts().len() == 5 && session.healthy_count() == 5,
        "Seed tree should be restored"
    );
    anyhow::ensure!(*session.config() == cfg, "Reset must keep configuration");

    let report = session.tick();
    anyhow::ensure!(
        report.advanced && report.elapsed_seconds == 1,
        "Clock should run again after reset"
    );
    Ok(())
}

fn config_coercion_expectation(_summary: &SimulationSummary) -> Result<()> {
    let mut session = BonsaiSession::new(1);
    let checks: [(ConfigField, u32); 6] = [
        (ConfigField::HealthyIntervalSeconds, {
            session.configure(ConfigField::HealthyIntervalSeconds, -5);
            session.config().healthy_interval_seconds()
        }),
        (ConfigField::BadIntervalSeconds, {
            session.configure(ConfigField::BadIntervalSeconds, 0);
            session.config().bad_interval_seconds()
        }),
        (ConfigField::WinThreshold, {
            session.configure(ConfigField::WinThreshold, 2.9);
            session.config().win_threshold()
        }),
        (ConfigField::LoseThreshold, {
            session.configure(ConfigField::LoseThreshold, " 7 ");
            session.config().lose_threshold()
        }),
        (ConfigField::LoseThreshold, {
            session.configure(ConfigField::LoseThreshold, "abc");
            session.config().lose_threshold()
        }),
        (ConfigField::BadIntervalSeconds, {
            session.configure(ConfigField::BadIntervalSeconds, f64::NAN);
            session.config().bad_interval_seconds()
        }),
    ];
    let expected = [1, 1, 2, 7, 1, 1];
    for ((field, got), want) in checks.iter().zip(expected) {
        anyhow::ensure!(*got == want, "{field} coerced to {got}, expected {want}");
    }

    // win threshold 2 with five healthy seeds ends the run on the spot
    anyhow::ensure!(
        session.outcome() == Outcome::Won,
        "Lowering the win threshold should be evaluated immediately"
    );
    Ok(())
}

fn deterministic_replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let replay = run_simulation(
        SimulationConfig::new(summary.strategy, summary.seed)
            .with_engine(summary.final_snapshot.config)
            .with_max_ticks(summary.ticks),
    );
    anyhow::ensure!(
        replay.final_snapshot == summary.final_snapshot,
        "Replay of seed {} diverged at t={}",
        summary.seed,
        replay.ticks
    );
    anyhow::ensure!(
        replay.metrics.cuts == summary.metrics.cuts,
        "Replay made {} cuts, first run made {}",
        replay.metrics.cuts,
        summary.metrics.cuts
    );
    Ok(())
}

fn terminal_freeze_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut session = BonsaiSession::with_config(summary.seed, EngineConfig::new(1, 1, 30, 1));
    let report = session.tick();
    anyhow::ensure!(
        report.outcome == Outcome::Lost && report.finished(),
        "One bad part should lose with threshold 1"
    );
    let frozen = session.snapshot();
    for _ in 0..10 {
        let report = session.tick();
        anyhow::ensure!(!report.advanced, "Tick advanced after the run ended");
    }
    anyhow::ensure!(session.snapshot() == frozen, "State changed after the run ended");

    session.configure(ConfigField::LoseThreshold, 50);
    anyhow::ensure!(
        session.outcome() == Outcome::Lost,
        "Config changes must not revive a finished run"
    );
    Ok(())
}

fn placement_window_expectation(summary: &SimulationSummary) -> Result<()> {
    let bounds = PlacementBounds::default();
    let mut session =
        BonsaiSession::with_config(summary.seed, EngineConfig::new(1, 1_000, 1_000, 1_000));
    for _ in 0..60 {
        session.tick();
    }
    let outside = session
        .parts()
        .iter()
        .skip(5)
        .find(|part| !bounds.contains(&part.position));
    if let Some(part) = outside {
        return Err(anyhow!(
            "Part {} spawned outside the window at ({:.1}, {:.1})",
            part.id,
            part.position.x,
            part.position.y
        ));
    }
    anyhow::ensure!(session.parts().len() == 65, "One spawn per tick expected");
    Ok(())
}

fn cut_rules_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut session = BonsaiSession::with_config(summary.seed, EngineConfig::new(1_000, 1, 30, 10));
    session.tick();
    let bad = *session
        .bad_ids()
        .first()
        .context("one part should be bad after the first decay")?;

    anyhow::ensure!(
        session.cut(PartId(999)).is_empty(),
        "Cutting an unknown id should be ignored"
    );

    let events = session.cut(bad);
    anyhow::ensure!(
        events.as_slice() == [EngineEvent::Cut { id: bad }],
        "Cut should emit one event, got {events:?}"
    );
    anyhow::ensure!(session.bad_count() == 0, "Cut part should stop counting as bad");
    anyhow::ensure!(
        session.cut(bad).is_empty(),
        "Cutting twice should be ignored"
    );

    let healthy = session
        .parts()
        .iter()
        .find(|part| part.is_healthy())
        .map(|part| part.id)
        .context("a healthy part should remain")?;
    let before = session.healthy_count();
    session.cut(healthy);
    anyhow::ensure!(
        session.healthy_count() == before - 1,
        "Cutting a healthy part removes it from the healthy count"
    );
    let part = session.part(healthy).context("cut parts stay in the registry")?;
    anyhow::ensure!(part.is_cut && !part.is_bad, "Cut part must never be bad");
    Ok(())
}
