//! Handler for `POST /checkin`.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use patrol_core::types::DbId;
use patrol_monitor::CheckInOutcome;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// A card scan, shared by the HTTP route and the `guard_checkin` frame.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[validate(range(min = 1))]
    pub user_id: DbId,
    #[validate(length(min = 1, max = 64))]
    pub checkpoint_card_num: String,
}

/// POST /api/v1/checkin
///
/// Record a check-in for `userId` at the checkpoint carrying the card.
pub async fn check_in(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CheckInRequest>,
) -> AppResult<Json<CheckInOutcome>> {
    let outcome = state
        .checkins
        .check_in(
            &auth.principal,
            input.user_id,
            &input.checkpoint_card_num,
            Utc::now(),
        )
        .await?;
    Ok(Json(outcome))
}
