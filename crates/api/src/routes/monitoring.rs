//! Route definitions for check-ins, GPS and the monitoring views.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{checkin, gps, logs};
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// POST /checkin            -> checkin::check_in         (any authenticated)
/// POST /gps                -> gps::record               (any authenticated)
/// GET  /gps/latest         -> gps::latest               (staff)
/// GET  /gps/{user_id}      -> gps::trail                (staff)
/// GET  /logs               -> logs::latest              (staff)
/// GET  /logs/history       -> logs::history             (admin)
/// GET  /guards/positions   -> logs::guard_positions     (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkin", post(checkin::check_in))
        .route("/gps", post(gps::record))
        .route("/gps/latest", get(gps::latest))
        .route("/gps/{user_id}", get(gps::trail))
        .route("/logs", get(logs::latest))
        .route("/logs/history", get(logs::history))
        .route("/guards/positions", get(logs::guard_positions))
}
