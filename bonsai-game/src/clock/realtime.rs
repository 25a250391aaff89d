//! Real-time clock driver on top of tokio.
//!
//! One task owns the session. Ticks come from a `tokio::time::Interval`,
//! commands from an mpsc channel, and both are serialised through a single
//! `select!` loop so a command never lands halfway through a tick.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::config::ConfigField;
use crate::part::PartId;
use crate::session::BonsaiSession;
use crate::state::EngineSnapshot;

/// External input applied between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockCommand {
    Cut(PartId),
    Reset,
    Configure { field: ConfigField, value: i64 },
    Shutdown,
}

/// Run `session` in real time until shutdown.
///
/// Publishes a snapshot after every tick and command. While the outcome is
/// terminal no timer exists at all; a reset creates exactly one new timer
/// whose first tick lands one full `period` later. Returns the session when
/// [`ClockCommand::Shutdown`] arrives or every command sender is dropped.
pub async fn drive(
    mut session: BonsaiSession,
    period: Duration,
    mut commands: mpsc::Receiver<ClockCommand>,
    snapshots: watch::Sender<EngineSnapshot>,
) -> BonsaiSession {
    let period = period.max(Duration::from_millis(1));
    let mut generation = session.clock().generation();
    let mut timer = session.is_running().then(|| start_timer(period));
    snapshots.send_replace(session.snapshot());

    loop {
        tokio::select! {
            biased;
            command = commands.recv() => {
                match command {
                    None | Some(ClockCommand::Shutdown) => break,
                    Some(command) => apply(&mut session, command),
                }
            }
            () = next_tick(&mut timer) => {
                let report = session.tick();
                log::trace!("tick {} -> {}", report.elapsed_seconds, report.outcome);
            }
        }

        if !session.is_running() {
            if timer.take().is_some() {
                log::debug!("clock stopped at t={}", session.elapsed_seconds());
            }
        } else if timer.is_none() || session.clock().generation() != generation {
            timer = Some(start_timer(period));
        }
        generation = session.clock().generation();
        snapshots.send_replace(session.snapshot());
    }

    log::debug!("clock driver shut down at t={}", session.elapsed_seconds());
    session
}

fn apply(session: &mut BonsaiSession, command: ClockCommand) {
    match command {
        ClockCommand::Cut(id) => {
            session.cut(id);
        }
        ClockCommand::Reset => {
            session.reset();
        }
        ClockCommand::Configure { field, value } => {
            session.configure(field, value);
        }
        ClockCommand::Shutdown => {}
    }
}

fn start_timer(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
