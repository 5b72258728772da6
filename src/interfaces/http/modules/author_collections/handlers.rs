//! Author collection handlers

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::dto::AuthorCollectionForCreationDto;
use crate::interfaces::http::common::{ApiResponse, AppError, AppResult, ValidatedJson};
use crate::interfaces::http::middleware::OutputFormat;
use crate::interfaces::http::modules::authors::{AuthorDto, AuthorForCreationDto, AuthorsState};

/// Parse `(id1,id2,...)`. The parentheses are optional and blank entries
/// are skipped.
pub fn parse_id_list(raw: &str) -> AppResult<Vec<Uuid>> {
    let inner = raw.trim();
    let inner = inner.strip_prefix('(').unwrap_or(inner);
    let inner = inner.strip_suffix(')').unwrap_or(inner);

    let ids = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|_| AppError::BadRequest(format!("'{}' is not a valid author id.", s)))
        })
        .collect::<AppResult<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(AppError::BadRequest("No author ids were given.".into()));
    }
    Ok(ids)
}

pub fn collection_location(ids: &[Uuid]) -> String {
    let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
    format!("/api/authorcollections/({})", ids.join(","))
}

#[utoipa::path(
    get,
    path = "/api/authorcollections/{ids}",
    tag = "Author collections",
    params(("ids" = String, Path, description = "Comma-separated author ids in parentheses")),
    responses(
        (status = 200, description = "Authors in request order", body = Vec<AuthorDto>),
        (status = 400, description = "Malformed id list", body = ApiResponse),
        (status = 404, description = "At least one author not found", body = ApiResponse)
    )
)]
pub async fn get_author_collection(
    State(state): State<AuthorsState>,
    Path(ids): Path<String>,
    _format: OutputFormat,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let ids = parse_id_list(&ids)?;
    let authors = state.authors.get_collection(&ids).await?;
    Ok(Json(authors.into_iter().map(AuthorDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/authorcollections",
    tag = "Author collections",
    request_body = Vec<AuthorForCreationDto>,
    responses(
        (status = 201, description = "Authors created", body = Vec<AuthorDto>),
        (status = 422, description = "Validation failed", body = ApiResponse)
    )
)]
pub async fn create_author_collection(
    State(state): State<AuthorsState>,
    _format: OutputFormat,
    ValidatedJson(body): ValidatedJson<AuthorCollectionForCreationDto>,
) -> AppResult<Response> {
    let authors = state
        .authors
        .create_collection(body.authors.into_iter().map(Into::into).collect())
        .await?;
    let dtos: Vec<AuthorDto> = authors.into_iter().map(AuthorDto::from).collect();
    let ids: Vec<Uuid> = dtos.iter().map(|a| a.id).collect();

    Ok((
        StatusCode::CREATED,
        [(LOCATION, collection_location(&ids))],
        Json(dtos),
    )
        .into_response())
}
