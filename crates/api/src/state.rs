use std::sync::Arc;

use patrol_events::{EventBus, LivePublisher};
use patrol_monitor::{CheckInProcessor, GpsRecorder, MonitoringStore, PgMonitoringStore};

use crate::auth::accounts::{AccountDirectory, PgAccountDirectory};
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: patrol_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (dashboards and guard devices).
    pub ws_manager: Arc<WsManager>,
    /// In-process bus carrying live `logs` and `gps` events.
    pub event_bus: Arc<EventBus>,
    /// Check-in processing over the shared store and bus.
    pub checkins: CheckInProcessor,
    /// GPS ping recording over the shared store and bus.
    pub gps: GpsRecorder,
    /// Account lookups used to re-validate every authenticated request.
    pub accounts: Arc<dyn AccountDirectory>,
}

impl AppState {
    /// Wire the monitoring services to `pool` and `event_bus`.
    pub fn new(
        pool: patrol_db::DbPool,
        config: Arc<ServerConfig>,
        ws_manager: Arc<WsManager>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let store: Arc<dyn MonitoringStore> = Arc::new(PgMonitoringStore::new(pool.clone()));
        let publisher: Arc<dyn LivePublisher> = event_bus.clone();
        Self {
            checkins: CheckInProcessor::new(Arc::clone(&store), Arc::clone(&publisher)),
            gps: GpsRecorder::new(store, publisher),
            accounts: Arc::new(PgAccountDirectory::new(pool.clone())),
            pool,
            config,
            ws_manager,
            event_bus,
        }
    }

    /// Replace the account lookups, e.g. with an in-memory directory.
    pub fn with_accounts(mut self, accounts: Arc<dyn AccountDirectory>) -> Self {
        self.accounts = accounts;
        self
    }
}
