//! Periodic escalation of silent checkpoints to `LATE` and `MISSED`.

use std::sync::Arc;
use std::time::Duration;

use patrol_db::DbPool;
use patrol_events::{EventBus, LivePublisher};
use patrol_monitor::{MonitoringStore, PgMonitoringStore, Sweeper};
use tokio_util::sync::CancellationToken;

/// Run the missed-patrol sweeper against the database until `cancel` fires.
///
/// Escalations are published on `event_bus` like any check-in.
pub async fn run(
    pool: DbPool,
    event_bus: Arc<EventBus>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Missed-patrol sweeper started"
    );

    let store: Arc<dyn MonitoringStore> = Arc::new(PgMonitoringStore::new(pool));
    let publisher: Arc<dyn LivePublisher> = event_bus;
    Sweeper::new(store, publisher)
        .with_interval(interval)
        .run(cancel)
        .await;
}
