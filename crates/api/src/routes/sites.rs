//! Route definitions for the `/sites` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::sites;
use crate::state::AppState;

/// Routes mounted at `/sites`.
///
/// ```text
/// GET    /       -> list     (staff)
/// POST   /       -> create   (admin)
/// GET    /{id}   -> get      (staff, includes checkpoints)
/// PUT    /{id}   -> update   (admin)
/// DELETE /{id}   -> delete   (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sites::list).post(sites::create))
        .route(
            "/{id}",
            get(sites::get).put(sites::update).delete(sites::delete),
        )
}
