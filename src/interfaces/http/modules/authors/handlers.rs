//! Author handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{
        header::{ALLOW, CONTENT_TYPE, LOCATION},
        HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::dto::{
    AuthorDto, AuthorForCreationDto, AuthorForCreationWithDateOfDeathDto, AuthorWithLinksDto,
};
use crate::application::{
    encode_component, shape, shape_all, type_has_properties, AuthorService,
    PropertyMappingService, ResourceQueryParameters,
};
use crate::domain::{Author, NewAuthor};
use crate::interfaces::http::common::{
    ApiResponse, AppError, AppResult, LinkDto, ResourceQuery, ValidatedJson,
};
use crate::interfaces::http::middleware::{
    media_types, ConstrainedHandlers, OutputFormat, RequestHeaderMatchesMediaType,
};
use crate::shared::PagedList;

pub const PAGINATION_HEADER: &str = "x-pagination";

/// Author handler state
#[derive(Clone)]
pub struct AuthorsState {
    pub authors: AuthorService,
    pub mappings: Arc<PropertyMappingService>,
}

pub fn author_location(id: Uuid) -> String {
    format!("/api/authors/{}", id)
}

/// Links of a single author. `fields` is carried into the self link.
pub fn author_links(id: Uuid, fields: Option<&str>) -> Vec<LinkDto> {
    let location = author_location(id);
    let self_href = match fields.map(str::trim).filter(|f| !f.is_empty()) {
        Some(fields) => format!("{}?fields={}", location, encode_component(fields)),
        None => location.clone(),
    };
    vec![
        LinkDto::new(self_href, "self", "GET"),
        LinkDto::new(location.clone(), "delete_author", "DELETE"),
        LinkDto::new(
            format!("{}/books", location),
            "create_book_for_author",
            "POST",
        ),
        LinkDto::new(format!("{}/books", location), "books", "GET"),
    ]
}

fn authors_page_uri(params: &ResourceQueryParameters) -> String {
    format!("/api/authors?{}", params.to_query_string())
}

fn collection_links<T>(params: &ResourceQueryParameters, page: &PagedList<T>) -> Vec<LinkDto> {
    let mut links = vec![LinkDto::new(authors_page_uri(params), "self", "GET")];
    if page.has_next() {
        links.push(LinkDto::new(
            authors_page_uri(&params.for_page(params.page_number + 1)),
            "nextPage",
            "GET",
        ));
    }
    if page.has_previous() {
        links.push(LinkDto::new(
            authors_page_uri(&params.for_page(params.page_number - 1)),
            "previousPage",
            "GET",
        ));
    }
    links
}

/// Paging metadata sent in the `X-Pagination` header. Plain JSON clients
/// also get the neighbouring page links there, since their body has none.
fn pagination_metadata<T>(
    params: &ResourceQueryParameters,
    page: &PagedList<T>,
    format: OutputFormat,
) -> Value {
    let mut meta = Map::new();
    if format == OutputFormat::Json {
        let previous = page
            .has_previous()
            .then(|| authors_page_uri(&params.for_page(params.page_number - 1)));
        let next = page
            .has_next()
            .then(|| authors_page_uri(&params.for_page(params.page_number + 1)));
        meta.insert("previousPageLink".into(), json!(previous));
        meta.insert("nextPageLink".into(), json!(next));
    }
    meta.insert("totalCount".into(), json!(page.total_count()));
    meta.insert("pageSize".into(), json!(page.page_size()));
    meta.insert("currentPage".into(), json!(page.current_page()));
    meta.insert("totalPages".into(), json!(page.total_pages()));
    Value::Object(meta)
}

fn with_links(mut shaped: Map<String, Value>, links: Vec<LinkDto>) -> AppResult<Value> {
    let links = serde_json::to_value(links).map_err(|e| AppError::Internal(e.to_string()))?;
    shaped.insert("links".into(), links);
    Ok(Value::Object(shaped))
}

fn ensure_fields(fields: Option<&str>) -> AppResult<()> {
    if type_has_properties::<AuthorDto>(fields) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "The requested fields '{}' are not all properties of an author.",
            fields.unwrap_or_default()
        )))
    }
}

#[utoipa::path(
    get,
    path = "/api/authors",
    tag = "Authors",
    params(
        ("pageNumber" = Option<i64>, Query, description = "Page number, 1-based"),
        ("pageSize" = Option<i64>, Query, description = "Page size, capped at 20"),
        ("genre" = Option<String>, Query, description = "Exact genre, case-insensitive"),
        ("searchQuery" = Option<String>, Query, description = "Substring of genre, first or last name"),
        ("orderBy" = Option<String>, Query, description = "Comma-separated sort clauses, e.g. `age desc`"),
        ("fields" = Option<String>, Query, description = "Comma-separated properties to return")
    ),
    responses(
        (status = 200, description = "One page of authors", body = Vec<AuthorDto>),
        (status = 400, description = "Invalid paging, ordering or fields", body = ApiResponse),
        (status = 406, description = "Unsupported Accept header", body = ApiResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AuthorsState>,
    format: OutputFormat,
    ResourceQuery(params): ResourceQuery,
) -> AppResult<Response> {
    if !state
        .mappings
        .authors()
        .valid_mapping_exists_for(&params.order_by)
    {
        return Err(AppError::BadRequest(format!(
            "Authors can't be ordered by '{}'.",
            params.order_by
        )));
    }
    ensure_fields(params.fields.as_deref())?;

    let page = state.authors.list(&params).await?;
    let metadata = pagination_metadata(&params, &page, format);
    let links = collection_links(&params, &page);
    let dtos: Vec<AuthorDto> = page.items().iter().cloned().map(AuthorDto::from).collect();
    let fields = params.fields.as_deref();

    let body = match format {
        OutputFormat::Json => Value::Array(
            shape_all(&dtos, fields)?
                .into_iter()
                .map(Value::Object)
                .collect(),
        ),
        OutputFormat::Hateoas => {
            let value = dtos
                .iter()
                .map(|dto| with_links(shape(dto, fields)?, author_links(dto.id, fields)))
                .collect::<AppResult<Vec<_>>>()?;
            json!({ "value": value, "links": links })
        }
    };

    let metadata = HeaderValue::from_str(&metadata.to_string())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((
        [(HeaderName::from_static(PAGINATION_HEADER), metadata)],
        Json(body),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/authors/{id}",
    tag = "Authors",
    params(
        ("id" = Uuid, Path, description = "Author id"),
        ("fields" = Option<String>, Query, description = "Comma-separated properties to return")
    ),
    responses(
        (status = 200, description = "Author with links", body = AuthorWithLinksDto),
        (status = 400, description = "Unknown field requested", body = ApiResponse),
        (status = 404, description = "Author not found", body = ApiResponse)
    )
)]
pub async fn get_author(
    State(state): State<AuthorsState>,
    Path(id): Path<Uuid>,
    _format: OutputFormat,
    ResourceQuery(params): ResourceQuery,
) -> AppResult<Json<Value>> {
    let fields = params.fields.as_deref();
    ensure_fields(fields)?;

    let dto = AuthorDto::from(state.authors.get(id).await?);
    let body = with_links(shape(&dto, fields)?, author_links(dto.id, fields))?;
    Ok(Json(body))
}

async fn created(state: &AuthorsState, author: NewAuthor) -> AppResult<Response> {
    let author: Author = state.authors.create(author).await?;
    let dto = AuthorDto::from(author);
    let body = AuthorWithLinksDto {
        links: author_links(dto.id, None),
        author: dto,
    };
    Ok((
        StatusCode::CREATED,
        [(LOCATION, author_location(body.author.id))],
        Json(body),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/authors",
    tag = "Authors",
    request_body(
        content = AuthorForCreationDto,
        content_type = "application/json",
        description = "Also accepted as application/vnd.marvin.author.full+json; \
            application/vnd.marvin.authorwithdateofdeath.full+json takes an optional dateOfDeath"
    ),
    responses(
        (status = 201, description = "Author created", body = AuthorWithLinksDto),
        (status = 404, description = "Unsupported Content-Type", body = ApiResponse),
        (status = 422, description = "Validation failed", body = ApiResponse)
    )
)]
pub async fn create_author(
    State(state): State<AuthorsState>,
    _format: OutputFormat,
    ValidatedJson(body): ValidatedJson<AuthorForCreationDto>,
) -> AppResult<Response> {
    created(&state, body.into()).await
}

pub async fn create_author_with_date_of_death(
    State(state): State<AuthorsState>,
    _format: OutputFormat,
    ValidatedJson(body): ValidatedJson<AuthorForCreationWithDateOfDeathDto>,
) -> AppResult<Response> {
    created(&state, body.into()).await
}

/// `POST /api/authors` picks its handler from the request's Content-Type.
pub fn create_author_handlers(state: AuthorsState) -> ConstrainedHandlers {
    ConstrainedHandlers::new()
        .candidate(
            RequestHeaderMatchesMediaType::new(
                CONTENT_TYPE,
                &[media_types::APPLICATION_JSON, media_types::AUTHOR_FULL_JSON],
            ),
            create_author,
            state.clone(),
        )
        .candidate(
            RequestHeaderMatchesMediaType::new(
                CONTENT_TYPE,
                &[media_types::AUTHOR_WITH_DATE_OF_DEATH_JSON],
            ),
            create_author_with_date_of_death,
            state,
        )
}

#[utoipa::path(
    post,
    path = "/api/authors/{id}",
    tag = "Authors",
    params(("id" = Uuid, Path, description = "Author id")),
    responses(
        (status = 409, description = "Author already exists", body = ApiResponse),
        (status = 404, description = "Author does not exist", body = ApiResponse)
    )
)]
pub async fn block_author_creation(
    State(state): State<AuthorsState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.authors.block_creation(id).await?;
    Ok(StatusCode::NOT_FOUND)
}

#[utoipa::path(
    delete,
    path = "/api/authors/{id}",
    tag = "Authors",
    params(("id" = Uuid, Path, description = "Author id")),
    responses(
        (status = 204, description = "Author and their books deleted"),
        (status = 404, description = "Author not found", body = ApiResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AuthorsState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    options,
    path = "/api/authors",
    tag = "Authors",
    responses((status = 200, description = "Allowed methods in the Allow header"))
)]
pub async fn authors_options() -> impl IntoResponse {
    (StatusCode::OK, [(ALLOW, "GET,OPTIONS,POST")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_link_carries_encoded_fields() {
        let id = Uuid::nil();
        let links = author_links(id, Some("id,name"));
        assert_eq!(
            links[0].href,
            format!("/api/authors/{}?fields=id%2Cname", id)
        );
        assert_eq!(links[0].rel, "self");
        assert_eq!(
            links.iter().map(|l| l.rel.as_str()).collect::<Vec<_>>(),
            ["self", "delete_author", "create_book_for_author", "books"]
        );

        assert_eq!(author_links(id, Some("  ")).remove(0).href, author_location(id));
    }

    #[test]
    fn json_metadata_includes_page_links() {
        let params = ResourceQueryParameters::from_pairs([("pageNumber", "2"), ("pageSize", "2")])
            .unwrap();
        let page = PagedList::new(vec![1, 2], 6, 2, 2).unwrap();

        let meta = pagination_metadata(&params, &page, OutputFormat::Json);
        assert_eq!(meta["totalCount"], 6);
        assert_eq!(meta["totalPages"], 3);
        assert_eq!(
            meta["previousPageLink"],
            "/api/authors?orderBy=Name&pageNumber=1&pageSize=2"
        );
        assert_eq!(
            meta["nextPageLink"],
            "/api/authors?orderBy=Name&pageNumber=3&pageSize=2"
        );

        let hateoas = pagination_metadata(&params, &page, OutputFormat::Hateoas);
        assert!(hateoas.get("nextPageLink").is_none());
        assert_eq!(hateoas["currentPage"], 2);
    }

    #[test]
    fn last_page_has_no_next_link() {
        let params = ResourceQueryParameters::from_pairs([("pageNumber", "3"), ("pageSize", "2")])
            .unwrap();
        let page = PagedList::new(vec![5, 6], 6, 3, 2).unwrap();

        let rels: Vec<_> = collection_links(&params, &page)
            .into_iter()
            .map(|l| l.rel)
            .collect();
        assert_eq!(rels, ["self", "previousPage"]);
        assert!(pagination_metadata(&params, &page, OutputFormat::Json)["nextPageLink"].is_null());
    }
}
