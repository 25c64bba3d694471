//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request},
    response::Response,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::failure;
use fintools_shared::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed bodies and rule violations are both rejected with a 400
/// envelope listing the messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                failure(
                    "Rejected request body",
                    &AppError::validation(rejection.body_text()),
                )
            })?;

        value
            .validate()
            .map_err(|errors| failure("Request failed validation", &AppError::from(errors)))?;

        Ok(Self(value))
    }
}
