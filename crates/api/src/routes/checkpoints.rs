//! Route definitions for the `/checkpoints` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::checkpoints;
use crate::state::AppState;

/// Routes mounted at `/checkpoints`.
///
/// ```text
/// GET    /?siteId=  -> list     (staff)
/// POST   /          -> create   (admin)
/// PUT    /{id}      -> update   (admin)
/// DELETE /{id}      -> delete   (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(checkpoints::list).post(checkpoints::create))
        .route(
            "/{id}",
            put(checkpoints::update).delete(checkpoints::delete),
        )
}
