pub mod auth;
pub mod checkpoints;
pub mod health;
pub mod monitoring;
pub mod sites;
pub mod superadmin;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket (token required)
///
/// /auth/login                           dashboard login (public)
/// /auth/guard                           guard device login (public)
///
/// /checkin                              check-in (POST)
/// /gps                                  record ping (POST)
/// /gps/latest                           latest ping per guard (GET)
/// /gps/{user_id}                        guard trail (GET)
/// /logs                                 latest log per checkpoint (GET)
/// /logs/history                         site ledger (GET)
/// /guards/positions                     last checkpoint per guard (GET)
///
/// /users                                list, create
/// /users/guards                         list guards
/// /users/{id}                           get, update, delete
/// /users/{id}/deactivate                soft-disable (POST)
///
/// /sites                                list, create
/// /sites/{id}                           get, update, delete
///
/// /checkpoints                          list (?siteId), create
/// /checkpoints/{id}                     update, delete
///
/// /superadmin/organizations             list, create
/// /superadmin/organizations/{id}        update, delete
/// /superadmin/organizations/{id}/status set status (PUT)
/// /superadmin/admins                    list, create
/// /superadmin/admins/{id}               update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .merge(monitoring::router())
        .nest("/users", users::router())
        .nest("/sites", sites::router())
        .nest("/checkpoints", checkpoints::router())
        .nest("/superadmin", superadmin::router())
}
