//! Per-client-IP rate limiting.
//!
//! Each configured rule becomes one `GovernorLayer`: a bucket of `limit`
//! requests per client that refills one slot every `period / limit`. The
//! client IP comes from `X-Forwarded-For`, `X-Real-IP` or `Forwarded`,
//! falling back to the peer address.

use std::time::Duration;

use axum::body::Body;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, Response, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router};
use tokio::task::JoinHandle;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_governor::{GovernorError, GovernorLayer};
use tracing::{debug, info, warn};

use crate::config::{RateLimitRule, RateLimitSection};
use crate::interfaces::http::common::error::UNEXPECTED_FAULT;
use crate::interfaces::http::common::ApiResponse;
use crate::shared::ShutdownSignal;

/// How often idle client buckets are dropped.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

fn rate_limit_error(error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ApiResponse::error(format!(
                    "API calls quota exceeded! Retry in {} seconds.",
                    wait_time
                ))),
            )
                .into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            if let Ok(value) = HeaderValue::from_str(&wait_time.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            warn!("Rate limiter could not determine the client address");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(UNEXPECTED_FAULT)),
            )
                .into_response()
        }
        GovernorError::Other { code, msg, headers } => {
            let mut response = (
                code,
                Json(ApiResponse::error(msg.unwrap_or_else(|| code.to_string()))),
            )
                .into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

/// Periodically run `retain_recent` until `shutdown` fires.
fn spawn_cleanup<F>(retain_recent: F, shutdown: ShutdownSignal) -> JoinHandle<()>
where
    F: Fn() + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        let stopped = shutdown.wait();
        tokio::pin!(stopped);
        loop {
            tokio::select! {
                _ = &mut stopped => break,
                _ = interval.tick() => retain_recent(),
            }
        }
        debug!("Rate limiter cleanup stopped");
    })
}

fn layer_router(router: Router, rule: &RateLimitRule, shutdown: &ShutdownSignal) -> Router {
    let Some(config) = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .period(rule.replenish_interval())
        .burst_size(rule.limit.max(1))
        .use_headers()
        .finish()
    else {
        warn!(?rule, "Ignoring invalid rate limit rule");
        return router;
    };

    let limiter = config.limiter().clone();
    spawn_cleanup(move || limiter.retain_recent(), shutdown.clone());

    info!(
        limit = rule.limit,
        period_secs = rule.period_secs,
        "Rate limit rule enabled"
    );
    router.layer(GovernorLayer::new(config).error_handler(rate_limit_error))
}

/// Wrap `router` with one limiter per configured rule. Idle client buckets
/// are cleaned up until `shutdown` fires.
pub fn apply_rate_limits(
    router: Router,
    config: &RateLimitSection,
    shutdown: &ShutdownSignal,
) -> Router {
    if !config.enabled {
        return router;
    }
    config
        .rules
        .iter()
        .fold(router, |router, rule| layer_router(router, rule, shutdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::routing::get;
    use tower::ServiceExt;

    fn app(config: &RateLimitSection) -> Router {
        apply_rate_limits(
            Router::new().route("/", get(|| async { "ok" })),
            config,
            &ShutdownSignal::new(),
        )
    }

    fn from_ip(ip: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn exceeding_the_burst_gives_429_per_client() {
        let config = RateLimitSection {
            enabled: true,
            rules: vec![RateLimitRule::new(2, 3600)],
        };
        let app = app(&config);

        for _ in 0..2 {
            let resp = app.clone().oneshot(from_ip("10.0.0.1")).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let limited = app.clone().oneshot(from_ip("10.0.0.1")).await.unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(limited.headers().contains_key(RETRY_AFTER));

        let other = app.oneshot(from_ip("10.0.0.2")).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cleanup_stops_on_shutdown() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let shutdown = ShutdownSignal::new();

        let handle = spawn_cleanup(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            shutdown.clone(),
        );
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("cleanup task did not stop")
            .unwrap();
        assert!(runs.load(Ordering::SeqCst) <= 1);
    }

    #[tokio::test]
    async fn disabled_config_adds_no_limits() {
        let app = app(&RateLimitSection::disabled());
        for _ in 0..5 {
            let resp = app
                .clone()
                .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }
}
