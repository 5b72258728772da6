//! Output format negotiation from the `Accept` header.

use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::interfaces::http::common::AppError;

pub mod media_types {
    pub const APPLICATION_JSON: &str = "application/json";
    pub const HATEOAS_JSON: &str = "application/vnd.marvin.hateoas+json";
    pub const AUTHOR_FULL_JSON: &str = "application/vnd.marvin.author.full+json";
    pub const AUTHOR_WITH_DATE_OF_DEATH_JSON: &str =
        "application/vnd.marvin.authorwithdateofdeath.full+json";
}

/// Representation requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Hateoas,
}

/// Media ranges listed in every `Accept` header, lower-cased and stripped
/// of parameters.
fn accepted_media_types(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|entry| {
            entry
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
        .filter(|m| !m.is_empty())
        .collect()
}

/// Whether the client asked for the hypermedia representation.
pub fn wants_hateoas(headers: &HeaderMap) -> bool {
    accepted_media_types(headers)
        .iter()
        .any(|m| m == media_types::HATEOAS_JSON)
}

/// Pick the output format, or fail with 406 when the client only accepts
/// representations this service cannot produce.
pub fn negotiate(headers: &HeaderMap) -> Result<OutputFormat, AppError> {
    let accepted = accepted_media_types(headers);
    if accepted.is_empty() {
        return Ok(OutputFormat::Json);
    }
    if accepted.iter().any(|m| m == media_types::HATEOAS_JSON) {
        return Ok(OutputFormat::Hateoas);
    }
    let json_ok = accepted
        .iter()
        .any(|m| m == media_types::APPLICATION_JSON || m == "application/*" || m == "*/*");
    if json_ok {
        Ok(OutputFormat::Json)
    } else {
        Err(AppError::NotAcceptable(format!(
            "None of the requested media types is supported: {}",
            accepted.join(", ")
        )))
    }
}

impl<S> FromRequestParts<S> for OutputFormat
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        negotiate(&parts.headers)
    }
}
