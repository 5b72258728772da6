//! Extractor binding the query string to [`ResourceQueryParameters`].

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use super::AppError;
use crate::application::ResourceQueryParameters;

/// `ResourceQueryParameters` bound from the request's query string.
/// Binding failures are answered with 400.
pub struct ResourceQuery(pub ResourceQueryParameters);

impl<S> FromRequestParts<S> for ResourceQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(Self(ResourceQueryParameters::from_pairs(pairs)?))
    }
}
