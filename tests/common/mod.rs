#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use library_api::config::RateLimitSection;
use library_api::domain::RepositoryProvider;
use library_api::infrastructure::database::seed::seed_demo_data;
use library_api::shared::ShutdownSignal;
use library_api::{
    create_api_router, init_and_migrate, AppConfig, DatabaseConfig, SeaOrmRepositoryProvider,
};

pub const HATEOAS: &str = "application/vnd.marvin.hateoas+json";

/// Full router over a seeded in-memory database, without rate limits.
pub async fn app() -> Router {
    let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    seed_demo_data(repos.as_ref()).await.unwrap();

    let config = AppConfig {
        rate_limit: RateLimitSection::disabled(),
        ..AppConfig::default()
    };
    create_api_router(db, repos, &config, &ShutdownSignal::new())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers[name].to_str().unwrap()
    }

    pub fn pagination(&self) -> Value {
        serde_json::from_str(self.header("x-pagination")).unwrap()
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_accepting(app: &Router, uri: &str, accept: &str) -> TestResponse {
    send(
        app,
        Request::get(uri)
            .header("accept", accept)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: &str,
    body: Value,
) -> TestResponse {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn author_id(app: &Router, search: &str) -> Uuid {
    let resp = get(app, &format!("/api/authors?searchQuery={}", search)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let id = resp.json()[0]["id"].as_str().unwrap().to_string();
    Uuid::parse_str(&id).unwrap()
}

pub fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}
