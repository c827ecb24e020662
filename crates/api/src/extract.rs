//! Request body extractor that runs `validator` rules after deserializing.

use axum::extract::{FromRequest, Request};
use axum::Json;
use patrol_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Like [`Json`], but rejects bodies failing their `#[validate]` rules with
/// a 400 `VALIDATION_ERROR`.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<CreateSiteRequest>) { .. }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value
            .validate()
            .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
        Ok(ValidatedJson(value))
    }
}
