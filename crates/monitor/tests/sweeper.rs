mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{at_minutes, t0, FakeStore, RecordingPublisher};
use patrol_core::roles::Role;
use patrol_core::timeliness::CheckpointStatus;
use patrol_events::LiveEventKind;
use patrol_monitor::{SweepReport, Sweeper};
use tokio_util::sync::CancellationToken;

fn setup() -> (Arc<FakeStore>, Arc<RecordingPublisher>, Sweeper) {
    let store = FakeStore::new();
    let publisher = RecordingPublisher::new();
    store.add_user(10, Some(1), Role::Guard);
    store.add_user(20, Some(2), Role::Guard);
    store.add_checkpoint(100, 1, "CARD-100", 10, 5);
    store.add_checkpoint(200, 2, "CARD-200", 10, 5);
    let sweeper = Sweeper::new(store.clone(), publisher.clone());
    (store, publisher, sweeper)
}

#[tokio::test]
async fn checkpoints_without_logs_are_skipped() {
    let (store, publisher, sweeper) = setup();

    let report = sweeper.tick(at_minutes(1_000)).await;

    assert_eq!(report, SweepReport::default());
    assert_eq!(store.log_count(), 0);
    assert!(publisher.events().is_empty());
}

#[tokio::test]
async fn missed_checkpoint_is_left_alone() {
    let (store, publisher, sweeper) = setup();
    store.seed_log(100, 10, CheckpointStatus::Missed, t0());

    for minutes in [1, 15, 60, 10_000] {
        sweeper.tick(at_minutes(minutes)).await;
    }

    assert_eq!(store.statuses(100), vec![CheckpointStatus::Missed]);
    assert!(publisher.events().is_empty());
}

#[tokio::test]
async fn silent_checkpoint_escalates_late_then_missed_once_each() {
    let (store, publisher, sweeper) = setup();
    store.seed_log(100, 10, CheckpointStatus::OnTime, t0());

    for minutes in 0..=60 {
        sweeper.tick(at_minutes(minutes)).await;
    }

    assert_eq!(
        store.statuses(100),
        vec![
            CheckpointStatus::OnTime,
            CheckpointStatus::Late,
            CheckpointStatus::Missed,
        ]
    );

    let events = publisher.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.kind == LiveEventKind::Logs));
    assert!(events.iter().all(|e| e.organization_id == 1));
    assert_eq!(events[0].payload["status"], "LATE");
    assert_eq!(events[0].payload["createdAt"], serde_json::json!(at_minutes(10)));
    assert_eq!(events[1].payload["status"], "MISSED");
    assert_eq!(events[1].payload["createdAt"], serde_json::json!(at_minutes(15)));
}

#[tokio::test]
async fn long_silence_goes_straight_to_missed() {
    let (store, _publisher, sweeper) = setup();
    store.seed_log(100, 10, CheckpointStatus::OnTime, t0());

    let report = sweeper.tick(at_minutes(90)).await;

    assert_eq!(report.escalated, 1);
    assert_eq!(
        store.statuses(100),
        vec![CheckpointStatus::OnTime, CheckpointStatus::Missed]
    );
}

#[tokio::test]
async fn check_in_late_row_escalates_at_end_of_pass_window() {
    let (store, _publisher, sweeper) = setup();
    // A LATE row written by a check-in at T+10 is treated like one the
    // sweeper wrote: MISSED follows `pass` minutes later, at T+15.
    store.seed_log(100, 10, CheckpointStatus::Late, at_minutes(10));

    sweeper.tick(at_minutes(14)).await;
    assert_eq!(store.statuses(100), vec![CheckpointStatus::Late]);

    sweeper.tick(at_minutes(15)).await;
    assert_eq!(
        store.statuses(100),
        vec![CheckpointStatus::Late, CheckpointStatus::Missed]
    );
}

#[tokio::test]
async fn ledger_never_shrinks_across_sweeps() {
    let (store, _publisher, sweeper) = setup();
    store.seed_log(100, 10, CheckpointStatus::OnTime, t0());
    store.seed_log(200, 20, CheckpointStatus::OnTime, at_minutes(3));

    let mut previous = store.log_count();
    for minutes in (0..120).step_by(2) {
        sweeper.tick(at_minutes(minutes)).await;
        let current = store.log_count();
        assert!(current >= previous);
        previous = current;
    }
    assert_eq!(previous, 6);
}

#[tokio::test]
async fn failure_on_one_checkpoint_does_not_stop_the_sweep() {
    let (store, publisher, sweeper) = setup();
    store.seed_log(100, 10, CheckpointStatus::OnTime, t0());
    store.seed_log(200, 20, CheckpointStatus::OnTime, t0());
    store.fail_inserts_for(100);

    let report = sweeper.tick(at_minutes(12)).await;

    assert_eq!(
        report,
        SweepReport {
            examined: 2,
            escalated: 1,
            failed: 1,
        }
    );
    assert_eq!(store.statuses(100), vec![CheckpointStatus::OnTime]);
    assert_eq!(
        store.statuses(200),
        vec![CheckpointStatus::OnTime, CheckpointStatus::Late]
    );
    let events = publisher.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].organization_id, 2);
}

#[tokio::test]
async fn listing_failure_ends_the_tick_quietly() {
    let (store, publisher, sweeper) = setup();
    store.seed_log(100, 10, CheckpointStatus::OnTime, t0());
    store.fail_listing();

    let report = sweeper.tick(at_minutes(30)).await;

    assert_eq!(report, SweepReport::default());
    assert_eq!(store.log_count(), 1);
    assert!(publisher.events().is_empty());
}

#[tokio::test]
async fn run_stops_when_cancelled() {
    let (_store, _publisher, sweeper) = setup();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(
        sweeper
            .with_interval(Duration::from_millis(10))
            .run(cancel.clone()),
    );

    tokio::time::sleep(Duration::from_millis(30)).await;
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("sweeper should stop promptly")
        .expect("sweeper task should not panic");
}
