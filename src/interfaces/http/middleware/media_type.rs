//! Choosing between several handlers registered for the same route.
//!
//! A route can carry more than one candidate handler, each guarded by an
//! [`ActionConstraint`]. [`ConstrainedHandlers`] evaluates the constraints
//! in ascending `order` (stable for equal orders) and runs the first
//! candidate that accepts the request. Without a match it runs the
//! unconstrained fallback, or answers 404.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::handler::Handler;
use axum::http::{HeaderMap, HeaderName, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceExt};

use crate::interfaces::http::common::ApiResponse;

/// Whether `header` is present and its value equals one of `media_types`,
/// ignoring ASCII case. Repeated headers are compared as one
/// comma-joined value.
pub fn header_matches_media_type(
    headers: &HeaderMap,
    header: &HeaderName,
    media_types: &[String],
) -> bool {
    let values: Option<Vec<&str>> = headers
        .get_all(header)
        .iter()
        .map(|v| v.to_str().ok())
        .collect();
    let value = match values {
        Some(values) if !values.is_empty() => values.join(", "),
        _ => return false,
    };
    media_types.iter().any(|m| m.eq_ignore_ascii_case(&value))
}

/// Guard deciding whether a candidate handler may serve a request.
pub trait ActionConstraint: Send + Sync {
    /// Lower orders are evaluated first.
    fn order(&self) -> i32;

    fn accept(&self, headers: &HeaderMap) -> bool;
}

/// Accepts requests whose `header` matches one of the given media types.
#[derive(Debug, Clone)]
pub struct RequestHeaderMatchesMediaType {
    header: HeaderName,
    media_types: Vec<String>,
}

impl RequestHeaderMatchesMediaType {
    pub fn new(header: HeaderName, media_types: &[&str]) -> Self {
        Self {
            header,
            media_types: media_types.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl ActionConstraint for RequestHeaderMatchesMediaType {
    fn order(&self) -> i32 {
        0
    }

    fn accept(&self, headers: &HeaderMap) -> bool {
        header_matches_media_type(headers, &self.header, &self.media_types)
    }
}

type HandlerService = BoxCloneSyncService<Request<Body>, Response, Infallible>;

fn boxed<H, T, S>(handler: H, state: S) -> HandlerService
where
    H: Handler<T, S> + Sync,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    BoxCloneSyncService::new(handler.with_state(state))
}

/// Candidate handlers of one route plus an optional fallback.
#[derive(Clone, Default)]
pub struct ConstrainedHandlers {
    candidates: Vec<(Arc<dyn ActionConstraint>, HandlerService)>,
    fallback: Option<HandlerService>,
}

impl ConstrainedHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate<C, H, T, S>(mut self, constraint: C, handler: H, state: S) -> Self
    where
        C: ActionConstraint + 'static,
        H: Handler<T, S> + Sync,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        self.candidates.push((Arc::new(constraint), boxed(handler, state)));
        self.candidates.sort_by_key(|(c, _)| c.order());
        self
    }

    pub fn fallback<H, T, S>(mut self, handler: H, state: S) -> Self
    where
        H: Handler<T, S> + Sync,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        self.fallback = Some(boxed(handler, state));
        self
    }

    fn select(&self, headers: &HeaderMap) -> Option<HandlerService> {
        self.candidates
            .iter()
            .find(|(constraint, _)| constraint.accept(headers))
            .map(|(_, svc)| svc.clone())
            .or_else(|| self.fallback.clone())
    }
}

impl Service<Request<Body>> for ConstrainedHandlers {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let selected = self.select(request.headers());
        Box::pin(async move {
            match selected {
                Some(svc) => svc.oneshot(request).await,
                None => Ok((
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::error("No handler accepts this request")),
                )
                    .into_response()),
            }
        })
    }
}
