//! Periodic detection of checkpoints that have gone silent.
//!
//! Each tick loads every checkpoint with its latest log and appends an
//! escalated status where [`sweep_transition`] reports one. Rows are only
//! ever appended.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use patrol_core::timeliness::sweep_transition;
use patrol_core::types::Timestamp;
use patrol_db::models::checkpoint::ScopedCheckpoint;
use patrol_db::models::monitoring_log::{MonitoringLog, MonitoringLogDetail, NewMonitoringLog};
use patrol_events::LivePublisher;
use tokio_util::sync::CancellationToken;

use crate::checkin::publish_log;
use crate::error::MonitorError;
use crate::store::MonitoringStore;

/// Default time between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Counters for a single sweep, mostly for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub escalated: usize,
    pub failed: usize,
}

/// Escalates overdue checkpoints to `LATE` and then `MISSED`.
pub struct Sweeper {
    store: Arc<dyn MonitoringStore>,
    publisher: Arc<dyn LivePublisher>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(store: Arc<dyn MonitoringStore>, publisher: Arc<dyn LivePublisher>) -> Self {
        Self {
            store,
            publisher,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run one sweep as of `now`.
    ///
    /// A failure on one checkpoint is logged and does not stop the others.
    pub async fn tick(&self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();

        let checkpoints = match self.store.find_all_checkpoints_with_latest_log().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "Sweep: failed to load checkpoints");
                return report;
            }
        };

        for (checkpoint, latest) in checkpoints {
            let Some(latest) = latest else { continue };
            report.examined += 1;

            match self.sweep_one(&checkpoint, &latest, now).await {
                Ok(true) => report.escalated += 1,
                Ok(false) => {}
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        checkpoint_id = checkpoint.checkpoint.id,
                        error = %e,
                        "Sweep: checkpoint failed"
                    );
                }
            }
        }

        if report.escalated > 0 || report.failed > 0 {
            tracing::info!(
                examined = report.examined,
                escalated = report.escalated,
                failed = report.failed,
                "Sweep finished"
            );
        }
        report
    }

    async fn sweep_one(
        &self,
        checkpoint: &ScopedCheckpoint,
        latest: &MonitoringLog,
        now: Timestamp,
    ) -> Result<bool, MonitorError> {
        let latest_status = latest.status()?;
        let thresholds = checkpoint.checkpoint.thresholds()?;

        let Some(status) = sweep_transition(latest_status, latest.created_at, now, thresholds)
        else {
            return Ok(false);
        };

        let log = self
            .store
            .insert_log(&NewMonitoringLog {
                guard_id: latest.guard_id,
                checkpoint_id: checkpoint.checkpoint.id,
                status,
                created_at: now,
            })
            .await?;

        tracing::info!(
            log_id = log.id,
            checkpoint_id = checkpoint.checkpoint.id,
            organization_id = checkpoint.organization_id,
            from = %latest_status,
            to = %status,
            "Checkpoint escalated"
        );

        // The row is already written; a missing guard only costs the live push.
        match self.store.find_user_by_id(latest.guard_id).await? {
            Some(guard) => {
                let record = MonitoringLogDetail::assemble(&log, &guard, checkpoint);
                publish_log(self.publisher.as_ref(), &record);
            }
            None => tracing::warn!(
                guard_id = latest.guard_id,
                "Sweep: guard vanished, escalation not published"
            ),
        }
        Ok(true)
    }

    /// Sweep every `interval` until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Missed-patrol sweeper started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Missed-patrol sweeper stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.tick(Utc::now()).await;
                }
            }
        }
    }
}
