//! HTTP cache headers and conditional requests.
//!
//! Successful GET/HEAD responses get a strong `ETag` (SHA-256 of the body),
//! `Last-Modified`, `Expires`, `Cache-Control` and `Vary: Accept`. A GET
//! whose `If-None-Match` lists the ETag of the response it would receive is
//! answered 304.
//!
//! Validators are remembered per path, query and negotiated representation.
//! A PUT whose `If-Match` differs from the stored validator is answered 412
//! without running the handler. A successful unsafe request forgets the
//! validators of its path, of everything below it and of the parent
//! collection. Writes to authors or author collections also forget the
//! author list and every author collection.

use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::header::{
    CACHE_CONTROL, ETAG, EXPIRES, IF_MATCH, IF_NONE_MATCH, LAST_MODIFIED, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::CacheHeadersSection;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::negotiation::{negotiate, OutputFormat};

const AUTHORS_PATH: &str = "/api/authors";
const AUTHOR_COLLECTIONS_PATH: &str = "/api/authorcollections";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResourceKey {
    path: String,
    query: String,
    format: OutputFormat,
}

impl ResourceKey {
    fn new(uri: &Uri, headers: &HeaderMap) -> Self {
        // A 406 is never stored, so the fallback format only names the slot.
        let format = negotiate(headers).unwrap_or(OutputFormat::Json);
        Self {
            path: uri.path().trim_end_matches('/').to_string(),
            query: uri.query().unwrap_or_default().to_ascii_lowercase(),
            format,
        }
    }
}

#[derive(Debug, Clone)]
struct Validator {
    etag: String,
    last_modified: DateTime<Utc>,
    stored_at: Instant,
}

/// Shared validator store plus the configured expiration policy.
#[derive(Clone)]
pub struct CacheHeadersState {
    validators: Arc<DashMap<ResourceKey, Validator>>,
    max_age: i64,
    max_entries: usize,
    cache_control: HeaderValue,
}

impl CacheHeadersState {
    pub fn new(config: &CacheHeadersSection) -> Self {
        let cache_control = HeaderValue::from_str(&config.cache_control())
            .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=600"));
        Self {
            validators: Arc::new(DashMap::new()),
            max_age: i64::try_from(config.max_age).unwrap_or(i64::MAX / 1000),
            max_entries: config.max_entries.max(1),
            cache_control,
        }
    }

    fn remember(&self, key: ResourceKey, validator: Validator) {
        if !self.validators.contains_key(&key) && self.validators.len() >= self.max_entries {
            self.make_room();
        }
        self.validators.insert(key, validator);
    }

    /// Drop validators older than `max_age`, then the oldest ones until a
    /// new entry fits.
    fn make_room(&self) {
        let max_age = StdDuration::from_secs(u64::try_from(self.max_age).unwrap_or(0));
        self.validators.retain(|_, v| v.stored_at.elapsed() < max_age);

        let excess = (self.validators.len() + 1).saturating_sub(self.max_entries);
        if excess == 0 {
            return;
        }
        let mut by_age: Vec<(Instant, ResourceKey)> = self
            .validators
            .iter()
            .map(|entry| (entry.value().stored_at, entry.key().clone()))
            .collect();
        by_age.sort_by_key(|(stored_at, _)| *stored_at);
        for (_, key) in by_age.into_iter().take(excess) {
            self.validators.remove(&key);
        }
        debug!(dropped = excess, "Validator store full, dropped oldest entries");
    }

    fn evict(&self, path: &str) {
        let path = path.trim_end_matches('/');
        let parent = parent_path(path);
        let touches_authors =
            is_within(path, AUTHORS_PATH) || is_within(path, AUTHOR_COLLECTIONS_PATH);
        self.validators.retain(|key, _| {
            let stale = is_within(&key.path, path)
                || key.path == parent
                || (touches_authors
                    && (key.path == AUTHORS_PATH
                        || is_within(&key.path, AUTHOR_COLLECTIONS_PATH)));
            !stale
        });
    }
}

/// `path` equals `root` or lies below it.
fn is_within(path: &str, root: &str) -> bool {
    path.strip_prefix(root)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
}

fn parent_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &trimmed[..i],
    }
}

pub fn strong_etag(body: &[u8]) -> String {
    format!("\"{:x}\"", Sha256::digest(body))
}

fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Whether any `name` header lists `etag` or `*`.
fn condition_matches(headers: &HeaderMap, name: axum::http::HeaderName, etag: &str) -> bool {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().trim_start_matches("W/"))
        .any(|v| v == "*" || v == etag)
}

fn set_header(headers: &mut HeaderMap, name: axum::http::HeaderName, value: &str) {
    if let Ok(v) = HeaderValue::from_str(value) {
        headers.insert(name, v);
    }
}

fn write_cache_headers(state: &CacheHeadersState, headers: &mut HeaderMap, validator: &Validator) {
    set_header(headers, ETAG, &validator.etag);
    set_header(headers, LAST_MODIFIED, &http_date(validator.last_modified));
    set_header(
        headers,
        EXPIRES,
        &http_date(Utc::now() + Duration::seconds(state.max_age)),
    );
    headers.insert(CACHE_CONTROL, state.cache_control.clone());
    headers.insert(VARY, HeaderValue::from_static("Accept"));
}

pub async fn cache_headers_middleware(
    State(state): State<CacheHeadersState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let key = ResourceKey::new(request.uri(), request.headers());

    if method == Method::GET || method == Method::HEAD {
        let conditions = request.headers().clone();
        let response = next.run(request).await;
        if response.status() != StatusCode::OK {
            return response;
        }
        return with_validator(&state, key, &conditions, method, response).await;
    }

    if method == Method::PUT || method == Method::PATCH {
        let stored = state.validators.get(&key).map(|v| v.etag.clone());
        if let Some(etag) = stored {
            if request.headers().contains_key(IF_MATCH)
                && !condition_matches(request.headers(), IF_MATCH, &etag)
            {
                return (
                    StatusCode::PRECONDITION_FAILED,
                    Json(ApiResponse::error("The resource has changed since it was read")),
                )
                    .into_response();
            }
        }
    }

    let response = next.run(request).await;
    if response.status().is_success() && method != Method::OPTIONS {
        state.evict(&path);
    }
    response
}

async fn with_validator(
    state: &CacheHeadersState,
    key: ResourceKey,
    conditions: &HeaderMap,
    method: Method,
    response: Response,
) -> Response {
    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "Response body could not be buffered");
            return (parts.status, parts.headers).into_response();
        }
    };

    let stored = state.validators.get(&key).map(|v| v.clone());
    // A HEAD response may already have lost its body; reuse the GET validator.
    let validator = if method == Method::HEAD && bytes.is_empty() {
        stored
    } else {
        let etag = strong_etag(&bytes);
        let last_modified = match stored {
            Some(v) if v.etag == etag => v.last_modified,
            _ => Utc::now(),
        };
        let validator = Validator {
            etag,
            last_modified,
            stored_at: Instant::now(),
        };
        state.remember(key, validator.clone());
        Some(validator)
    };

    let Some(validator) = validator else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    if condition_matches(conditions, IF_NONE_MATCH, &validator.etag) {
        debug!(etag = %validator.etag, "Validator matched, answering 304");
        let mut response = StatusCode::NOT_MODIFIED.into_response();
        write_cache_headers(state, response.headers_mut(), &validator);
        return response;
    }

    write_cache_headers(state, &mut parts.headers, &validator);
    Response::from_parts(parts, Body::from(bytes))
}
