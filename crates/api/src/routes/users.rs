//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// All routes require `ADMIN` or `SUPERADMIN` (enforced by handler extractors).
///
/// ```text
/// GET    /                  -> list_members
/// POST   /                  -> create_member
/// GET    /guards            -> list_guards
/// GET    /{id}              -> get_member
/// PUT    /{id}              -> update_member
/// DELETE /{id}              -> delete_member
/// POST   /{id}/deactivate   -> deactivate_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_members).post(users::create_member))
        .route("/guards", get(users::list_guards))
        .route(
            "/{id}",
            get(users::get_member)
                .put(users::update_member)
                .delete(users::delete_member),
        )
        .route("/{id}/deactivate", post(users::deactivate_member))
}
