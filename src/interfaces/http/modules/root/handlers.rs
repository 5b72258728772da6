//! Entry point of the API

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::interfaces::http::common::{ApiResponse, LinkDto};
use crate::interfaces::http::middleware::wants_hateoas;

pub fn root_links() -> Vec<LinkDto> {
    vec![
        LinkDto::new("/api", "self", "GET"),
        LinkDto::new("/api/authors", "authors", "GET"),
        LinkDto::new("/api/authors", "create_author", "POST"),
    ]
}

#[utoipa::path(
    get,
    path = "/api",
    tag = "Root",
    responses(
        (status = 200, description = "Links to the top-level resources (hypermedia clients)", body = Vec<LinkDto>),
        (status = 204, description = "Plain clients get no document"),
        (status = 406, description = "Unsupported Accept header", body = ApiResponse)
    )
)]
pub async fn get_root(headers: HeaderMap) -> Response {
    if wants_hateoas(&headers) {
        Json(root_links()).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
