/**
 * Request Extractors
 *
 * JSON body and query string extractors whose rejections are
 * `BackendError`s, so malformed bodies and query strings get
 * the same JSON error shape as every other failure.
 */

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;

/// JSON request body
///
/// An empty body reads as `{}`, so requests whose fields are all optional
/// may omit it.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state).await.map_err(|rejection| {
            tracing::warn!("Unreadable request body: {}", rejection.body_text());
            BackendError::bad_request(rejection.body_text())
        })?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };
        serde_json::from_slice(body).map(Payload).map_err(|e| {
            tracing::warn!("Rejected request body: {}", e);
            BackendError::bad_request(format!("Invalid JSON body: {}", e))
        })
    }
}

/// Query string parameters
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Params(value)),
            Err(rejection) => {
                tracing::warn!("Rejected query string: {}", rejection.body_text());
                Err(BackendError::bad_request(rejection.body_text()))
            }
        }
    }
}
