use anyhow::{Context, Result};
use bonsai_game::{BonsaiSession, ClockCommand, EngineConfig, EngineSnapshot, Outcome, drive};
use colored::Colorize;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use crate::logic::policy::GameplayStrategy;

/// Settings for a wall-clock run driven by the tokio clock.
#[derive(Debug, Clone, Copy)]
pub struct LiveOptions {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub engine: EngineConfig,
    pub tick: Duration,
    pub max_ticks: u64,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct LiveSummary {
    pub outcome: Outcome,
    pub ticks: u64,
    pub cuts: usize,
    pub final_snapshot: EngineSnapshot,
}

/// Play one session in real time: the engine ticks on its own timer while
/// the policy watches published snapshots and sends cut commands.
pub async fn run_live(options: LiveOptions) -> Result<LiveSummary> {
    let session = BonsaiSession::with_config(options.seed, options.engine);
    let (commands, command_rx) = mpsc::channel(32);
    let (snapshot_tx, mut snapshots) = watch::channel(session.snapshot());
    let driver = tokio::spawn(drive(session, options.tick, command_rx, snapshot_tx));

    let mut policy = options.strategy.create_policy(options.seed);
    let mut last_tick = 0;
    let mut cuts = 0;

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.elapsed_seconds > last_tick {
            last_tick = snapshot.elapsed_seconds;
            if options.verbose {
                println!(
                    "  ⏱️  t={:>4} healthy {:>3} bad {:>3} {}",
                    snapshot.elapsed_seconds,
                    snapshot.healthy_count,
                    snapshot.bad_count,
                    snapshot.outcome
                );
            }
            let decision = policy.pick_cuts(&snapshot);
            for id in decision.cuts {
                commands
                    .send(ClockCommand::Cut(id))
                    .await
                    .context("clock driver stopped accepting commands")?;
                cuts += 1;
            }
        }
        if snapshot.outcome.is_terminal() || snapshot.elapsed_seconds >= options.max_ticks {
            break;
        }
    }

    // The driver may already be gone if it stopped on its own.
    let _ = commands.send(ClockCommand::Shutdown).await;
    let session = driver.await.context("clock driver task failed")?;
    log::info!(
        "live run seed {} finished {} at t={}",
        options.seed,
        session.outcome(),
        session.elapsed_seconds()
    );

    Ok(LiveSummary {
        outcome: session.outcome(),
        ticks: session.elapsed_seconds(),
        cuts,
        final_snapshot: session.snapshot(),
    })
}

pub fn print_live_summary(seed: u64, strategy: GameplayStrategy, summary: &LiveSummary) {
    let outcome = match summary.outcome {
        Outcome::Won => "🌳 WON".green().bold(),
        Outcome::Lost => "🍂 LOST".red().bold(),
        Outcome::InProgress => "⏸️  UNFINISHED".yellow().bold(),
    };
    println!(
        "{} seed {} ({}) after {} ticks: healthy {} bad {} cuts {}",
        outcome,
        seed,
        strategy,
        summary.ticks,
        summary.final_snapshot.healthy_count,
        summary.final_snapshot.bad_count,
        summary.cuts
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(strategy: GameplayStrategy) -> LiveOptions {
        LiveOptions {
            seed: 5,
            strategy,
            engine: EngineConfig::default(),
            tick: Duration::from_millis(100),
            max_ticks: 300,
            verbose: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_live_run_loses_on_schedule() {
        let summary = run_live(options(GameplayStrategy::Idle)).await.unwrap();
        assert_eq!(summary.outcome, Outcome::Lost);
        assert_eq!(summary.ticks, 20);
        assert_eq!(summary.cuts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn diligent_live_run_wins() {
        let summary = run_live(options(GameplayStrategy::Diligent)).await.unwrap();
        assert_eq!(summary.outcome, Outcome::Won);
        assert_eq!(summary.final_snapshot.bad_count, 0);
        assert!(summary.cuts > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_cap_ends_live_run() {
        let mut opts = options(GameplayStrategy::Diligent);
        opts.max_ticks = 5;
        let summary = run_live(opts).await.unwrap();
        assert_eq!(summary.outcome, Outcome::InProgress);
        assert_eq!(summary.ticks, 5);
    }
}
