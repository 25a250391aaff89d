use std::time::Duration;

use bonsai_game::{
    BonsaiSession, ClockCommand, ConfigField, EngineConfig, Outcome, PartId, drive,
};
use tokio::sync::{mpsc, watch};

const PERIOD: Duration = Duration::from_secs(1);

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period() {
    let session = BonsaiSession::new(7);
    let (tx, rx) = mpsc::channel(8);
    let (snap_tx, snap_rx) = watch::channel(session.snapshot());
    let handle = tokio::spawn(drive(session, PERIOD, rx, snap_tx));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(snap_rx.borrow().elapsed_seconds, 0);

    tokio::time::sleep(Duration::from_millis(3_000)).await;
    assert_eq!(snap_rx.borrow().elapsed_seconds, 3);

    tx.send(ClockCommand::Shutdown).await.unwrap();
    let session = handle.await.unwrap();
    assert_eq!(session.elapsed_seconds(), 3);
    assert_eq!(session.parts().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn stops_on_terminal_outcome_and_restarts_on_reset() {
    let session = BonsaiSession::with_config(3, EngineConfig::new(1, 1, 30, 1));
    let (tx, rx) = mpsc::channel(8);
    let (snap_tx, snap_rx) = watch::channel(session.snapshot());
    let handle = tokio::spawn(drive(session, PERIOD, rx, snap_tx));

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    {
        let snapshot = snap_rx.borrow();
        assert_eq!(snapshot.outcome, Outcome::Lost);
        assert_eq!(snapshot.elapsed_seconds, 1, "clock kept running after loss");
    }

    tx.send(ClockCommand::Configure {
        field: ConfigField::LoseThreshold,
        value: 50,
    })
    .await
    .unwrap();
    tx.send(ClockCommand::Reset).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    {
        let snapshot = snap_rx.borrow();
        assert_eq!(snapshot.outcome, Outcome::InProgress);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert_eq!(snapshot.config.lose_threshold(), 50);
    }

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert_eq!(snap_rx.borrow().elapsed_seconds, 2);

    drop(tx);
    let session = handle.await.unwrap();
    assert_eq!(session.elapsed_seconds(), 2);
    assert_eq!(session.clock().generation(), 2);
}

#[tokio::test(start_paused = true)]
async fn commands_apply_between_ticks() {
    let session = BonsaiSession::with_config(12, EngineConfig::new(5, 1, 30, 10));
    let (tx, rx) = mpsc::channel(8);
    let (snap_tx, snap_rx) = watch::channel(session.snapshot());
    let handle = tokio::spawn(drive(session, PERIOD, rx, snap_tx));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let bad: Vec<PartId> = snap_rx
        .borrow()
        .parts
        .iter()
        .filter(|part| part.is_bad && !part.is_cut)
        .map(|part| part.id)
        .collect();
    assert_eq!(bad.len(), 1);

    tx.send(ClockCommand::Cut(bad[0])).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    {
        let snapshot = snap_rx.borrow();
        assert_eq!(snapshot.bad_count, 0);
        assert_eq!(snapshot.elapsed_seconds, 1);
        assert!(snapshot.parts.iter().any(|part| part.id == bad[0] && part.is_cut));
    }

    tx.send(ClockCommand::Shutdown).await.unwrap();
    let session = handle.await.unwrap();
    assert_eq!(session.bad_count(), 0);
}
