//! In-memory doubles for the monitoring ports.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use patrol_core::roles::{AccountStatus, Role};
use patrol_core::timeliness::CheckpointStatus;
use patrol_core::types::{DbId, Timestamp};
use patrol_db::models::checkpoint::{Checkpoint, ScopedCheckpoint};
use patrol_db::models::gps_log::{GpsLog, NewGpsLog};
use patrol_db::models::monitoring_log::{MonitoringLog, NewMonitoringLog};
use patrol_db::models::user::User;
use patrol_events::{LiveEvent, LivePublisher};
use patrol_monitor::MonitoringStore;

pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
}

pub fn at_minutes(m: i64) -> Timestamp {
    t0() + Duration::minutes(m)
}

#[derive(Default)]
struct State {
    users: HashMap<DbId, User>,
    checkpoints: Vec<ScopedCheckpoint>,
    logs: Vec<MonitoringLog>,
    gps: Vec<GpsLog>,
    next_id: DbId,
    failing_checkpoints: HashSet<DbId>,
    fail_listing: bool,
}

/// A [`MonitoringStore`] kept in memory, with switchable failures.
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<State>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, id: DbId, organization_id: Option<DbId>, role: Role) -> User {
        let user = User {
            id,
            organization_id,
            login: format!("user{id}"),
            username: Some(format!("User {id}")),
            password_hash: "not-a-hash".into(),
            role: role.as_str().into(),
            status: AccountStatus::Active.as_str().into(),
            created_at: t0(),
            updated_at: t0(),
        };
        self.state.lock().unwrap().users.insert(id, user.clone());
        user
    }

    pub fn deactivate(&self, id: DbId) {
        if let Some(user) = self.state.lock().unwrap().users.get_mut(&id) {
            user.status = AccountStatus::Inactive.as_str().into();
        }
    }

    pub fn add_checkpoint(
        &self,
        id: DbId,
        organization_id: DbId,
        card_number: &str,
        normal_minutes: i32,
        pass_minutes: i32,
    ) {
        let checkpoint = Checkpoint {
            id,
            site_id: organization_id * 100,
            name: format!("Gate {id}"),
            card_number: card_number.into(),
            normal_minutes,
            pass_minutes,
            position_x: Some(10.0),
            position_y: Some(20.0),
            latitude: None,
            longitude: None,
            created_at: t0(),
            updated_at: t0(),
        };
        self.state.lock().unwrap().checkpoints.push(ScopedCheckpoint {
            checkpoint,
            organization_id,
        });
    }

    pub fn seed_log(
        &self,
        checkpoint_id: DbId,
        guard_id: DbId,
        status: CheckpointStatus,
        created_at: Timestamp,
    ) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.logs.push(MonitoringLog {
            id,
            guard_id,
            checkpoint_id,
            status: status.as_str().into(),
            created_at,
        });
    }

    /// Statuses of a checkpoint's logs in insertion order.
    pub fn statuses(&self, checkpoint_id: DbId) -> Vec<CheckpointStatus> {
        self.state
            .lock()
            .unwrap()
            .logs
            .iter()
            .filter(|l| l.checkpoint_id == checkpoint_id)
            .map(|l| l.status().unwrap())
            .collect()
    }

    pub fn log_count(&self) -> usize {
        self.state.lock().unwrap().logs.len()
    }

    pub fn gps_count(&self) -> usize {
        self.state.lock().unwrap().gps.len()
    }

    pub fn fail_inserts_for(&self, checkpoint_id: DbId) {
        self.state
            .lock()
            .unwrap()
            .failing_checkpoints
            .insert(checkpoint_id);
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    fn latest(state: &State, checkpoint_id: DbId) -> Option<MonitoringLog> {
        state
            .logs
            .iter()
            .filter(|l| l.checkpoint_id == checkpoint_id)
            .max_by_key(|l| (l.created_at, l.id))
            .cloned()
    }
}

#[async_trait]
impl MonitoringStore for FakeStore {
    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        Ok(self.state.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_checkpoint_by_card(
        &self,
        card_number: &str,
    ) -> Result<Option<ScopedCheckpoint>, sqlx::Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .checkpoints
            .iter()
            .find(|c| c.checkpoint.card_number == card_number)
            .cloned())
    }

    async fn find_latest_log_for_checkpoint(
        &self,
        checkpoint_id: DbId,
    ) -> Result<Option<MonitoringLog>, sqlx::Error> {
        Ok(Self::latest(&self.state.lock().unwrap(), checkpoint_id))
    }

    async fn insert_log(&self, input: &NewMonitoringLog) -> Result<MonitoringLog, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        if state.failing_checkpoints.contains(&input.checkpoint_id) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        state.next_id += 1;
        let log = MonitoringLog {
            id: state.next_id,
            guard_id: input.guard_id,
            checkpoint_id: input.checkpoint_id,
            status: input.status.as_str().into(),
            created_at: input.created_at,
        };
        state.logs.push(log.clone());
        Ok(log)
    }

    async fn find_all_checkpoints_with_latest_log(
        &self,
    ) -> Result<Vec<(ScopedCheckpoint, Option<MonitoringLog>)>, sqlx::Error> {
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(state
            .checkpoints
            .iter()
            .map(|c| (c.clone(), Self::latest(&state, c.checkpoint.id)))
            .collect())
    }

    async fn insert_gps_log(&self, input: &NewGpsLog) -> Result<GpsLog, sqlx::Error> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let ping = GpsLog {
            id: state.next_id,
            guard_id: input.guard_id,
            latitude: input.location.lat,
            longitude: input.location.lng,
            created_at: input.created_at,
        };
        state.gps.push(ping.clone());
        Ok(ping)
    }
}

/// A [`LivePublisher`] that remembers everything it was given.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<LiveEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<LiveEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl LivePublisher for RecordingPublisher {
    fn publish(&self, event: LiveEvent) {
        self.events.lock().unwrap().push(event);
    }
}
