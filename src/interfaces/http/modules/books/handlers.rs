//! Book handlers

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::dto::{BookDto, BookForCreationDto, BookForUpdateDto};
use crate::application::{BookService, UpsertOutcome};
use crate::interfaces::http::common::{ApiResponse, AppResult, ValidatedJson};
use crate::interfaces::http::middleware::OutputFormat;

/// Book handler state
#[derive(Clone)]
pub struct BooksState {
    pub books: BookService,
}

pub fn book_location(author_id: Uuid, book_id: Uuid) -> String {
    format!("/api/authors/{}/books/{}", author_id, book_id)
}

fn created(book: BookDto) -> Response {
    let location = book_location(book.author_id, book.id);
    (StatusCode::CREATED, [(LOCATION, location)], Json(book)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/authors/{author_id}/books",
    tag = "Books",
    params(("author_id" = Uuid, Path, description = "Author id")),
    responses(
        (status = 200, description = "Books of the author", body = Vec<BookDto>),
        (status = 404, description = "Author not found", body = ApiResponse)
    )
)]
pub async fn list_books(
    State(state): State<BooksState>,
    Path(author_id): Path<Uuid>,
    _format: OutputFormat,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.books.list(author_id).await?;
    Ok(Json(books.into_iter().map(BookDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/authors/{author_id}/books/{id}",
    tag = "Books",
    params(
        ("author_id" = Uuid, Path, description = "Author id"),
        ("id" = Uuid, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Author or book not found", body = ApiResponse)
    )
)]
pub async fn get_book(
    State(state): State<BooksState>,
    Path((author_id, id)): Path<(Uuid, Uuid)>,
    _format: OutputFormat,
) -> AppResult<Json<BookDto>> {
    let book = state.books.get(author_id, id).await?;
    Ok(Json(BookDto::from(book)))
}

#[utoipa::path(
    post,
    path = "/api/authors/{author_id}/books",
    tag = "Books",
    params(("author_id" = Uuid, Path, description = "Author id")),
    request_body = BookForCreationDto,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 404, description = "Author not found", body = ApiResponse),
        (status = 422, description = "Validation failed", body = ApiResponse)
    )
)]
pub async fn create_book(
    State(state): State<BooksState>,
    Path(author_id): Path<Uuid>,
    _format: OutputFormat,
    ValidatedJson(body): ValidatedJson<BookForCreationDto>,
) -> AppResult<Response> {
    let book = state.books.create(author_id, body.into()).await?;
    Ok(created(BookDto::from(book)))
}

#[utoipa::path(
    put,
    path = "/api/authors/{author_id}/books/{id}",
    tag = "Books",
    params(
        ("author_id" = Uuid, Path, description = "Author id"),
        ("id" = Uuid, Path, description = "Book id")
    ),
    request_body = BookForUpdateDto,
    responses(
        (status = 201, description = "Book did not exist and was created", body = BookDto),
        (status = 204, description = "Book updated"),
        (status = 404, description = "Author not found", body = ApiResponse),
        (status = 412, description = "If-Match does not match", body = ApiResponse),
        (status = 422, description = "Validation failed", body = ApiResponse)
    )
)]
pub async fn update_book(
    State(state): State<BooksState>,
    Path((author_id, id)): Path<(Uuid, Uuid)>,
    ValidatedJson(body): ValidatedJson<BookForUpdateDto>,
) -> AppResult<Response> {
    match state.books.upsert(author_id, id, body.into()).await? {
        UpsertOutcome::Created(book) => Ok(created(BookDto::from(book))),
        UpsertOutcome::Updated(_) => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/authors/{author_id}/books/{id}",
    tag = "Books",
    params(
        ("author_id" = Uuid, Path, description = "Author id"),
        ("id" = Uuid, Path, description = "Book id")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Author or book not found", body = ApiResponse)
    )
)]
pub async fn delete_book(
    State(state): State<BooksState>,
    Path((author_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state.books.delete(author_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
