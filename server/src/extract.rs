//! Extractors that report failures as `ApiError`.
//!
//! axum's stock extractors reject with plain-text bodies and a mix of 400,
//! 415 and 422. Wrapping them keeps every error response in the
//! `{"detail": ...}` shape with status 422.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::Validate;

/// JSON body that has passed `Validate`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// The `{id}` path segment, required to be a positive integer.
#[derive(Clone, Copy, Debug)]
pub struct TodoId(pub i32);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        if id < 1 {
            return Err(ApiError::Validation(format!(
                "todo id must be a positive integer, got {id}"
            )));
        }
        Ok(TodoId(id))
    }
}
