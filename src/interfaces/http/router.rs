//! API Router with Swagger UI

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRef, State},
    http::{
        header::{ACCESS_CONTROL_REQUEST_METHOD, ETAG, LOCATION},
        HeaderName, Method, Request, Response, StatusCode,
    },
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthorService, BookService, PropertyMappingService};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::error::UNEXPECTED_FAULT;
use crate::interfaces::http::common::{ApiResponse, LinkDto};
use crate::interfaces::http::middleware::{
    apply_rate_limits, cache_headers_middleware, request_id_middleware, CacheHeadersState,
};
use crate::interfaces::http::modules::{author_collections, authors, books, health, root};
use crate::shared::ShutdownSignal;

/// State shared by every `/api` route. Handlers extract their own slice
/// of it through `FromRef`.
#[derive(Clone)]
pub struct LibraryState {
    pub authors: AuthorService,
    pub books: BookService,
    pub mappings: Arc<PropertyMappingService>,
}

impl LibraryState {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        let mappings = Arc::new(PropertyMappingService::new());
        Self {
            authors: AuthorService::new(Arc::clone(&repos), Arc::clone(&mappings)),
            books: BookService::new(repos),
            mappings,
        }
    }
}

impl FromRef<LibraryState> for authors::AuthorsState {
    fn from_ref(s: &LibraryState) -> Self {
        authors::AuthorsState {
            authors: s.authors.clone(),
            mappings: Arc::clone(&s.mappings),
        }
    }
}

impl FromRef<LibraryState> for books::BooksState {
    fn from_ref(s: &LibraryState) -> Self {
        books::BooksState {
            books: s.books.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Root
        root::get_root,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::block_author_creation,
        authors::delete_author,
        authors::authors_options,
        // Author collections
        author_collections::get_author_collection,
        author_collections::create_author_collection,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            ApiResponse,
            LinkDto,
            health::HealthResponse,
            health::ComponentHealth,
            authors::AuthorDto,
            authors::AuthorWithLinksDto,
            authors::AuthorForCreationDto,
            authors::AuthorForCreationWithDateOfDeathDto,
            books::BookDto,
            books::BookForCreationDto,
            books::BookForUpdateDto,
        )
    ),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Root", description = "Entry point with hypermedia links"),
        (name = "Authors", description = "Paged, filtered, sorted and shaped author resources"),
        (name = "Author collections", description = "Batch creation and retrieval of authors"),
        (name = "Books", description = "Books of an author"),
    ),
    info(
        title = "Library API",
        version = "1.0.0",
        description = "REST API for authors and their books"
    )
)]
pub struct ApiDoc;

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(target: "global_exception_logger", panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(UNEXPECTED_FAULT)),
    )
        .into_response()
}

/// `CorsLayer` answers every OPTIONS request as a preflight. An OPTIONS
/// request without `Access-Control-Request-Method` is sent to `routes`
/// instead, so the route's own OPTIONS handler answers it.
async fn route_plain_options(
    State(routes): State<Router>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let is_preflight = request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD);
    if request.method() == Method::OPTIONS && !is_preflight {
        return routes.oneshot(request).await.into_response();
    }
    next.run(request).await
}

/// Routes under `/api`, before any layer is applied.
fn library_routes(state: LibraryState) -> Router {
    let authors_state = authors::AuthorsState::from_ref(&state);

    Router::new()
        .route("/api", get(root::get_root))
        // Authors
        .route(
            "/api/authors",
            get(authors::list_authors)
                .post_service(authors::create_author_handlers(authors_state))
                .options(authors::authors_options),
        )
        .route(
            "/api/authors/{id}",
            get(authors::get_author)
                .post(authors::block_author_creation)
                .delete(authors::delete_author),
        )
        // Author collections
        .route(
            "/api/authorcollections",
            post(author_collections::create_author_collection),
        )
        .route(
            "/api/authorcollections/{ids}",
            get(author_collections::get_author_collection),
        )
        // Books
        .route(
            "/api/authors/{author_id}/books",
            get(books::list_books).post(books::create_book),
        )
        .route(
            "/api/authors/{author_id}/books/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state)
}

/// Create the API router with all routes. Background upkeep of the rate
/// limiters ends when `shutdown` fires.
pub fn create_api_router(
    db: DatabaseConnection,
    repos: Arc<dyn RepositoryProvider>,
    config: &AppConfig,
    shutdown: &ShutdownSignal,
) -> Router {
    let cache_state = CacheHeadersState::new(&config.cache_headers);

    let api_routes = library_routes(LibraryState::new(repos)).layer(
        middleware::from_fn_with_state(cache_state, cache_headers_middleware),
    );
    let api_routes = apply_rate_limits(api_routes, &config.rate_limit, shutdown);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState::new(db));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
        .expose_headers([
            HeaderName::from_static(authors::PAGINATION_HEADER),
            LOCATION,
            ETAG,
        ]);

    let routes = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(api_routes);

    routes
        .clone()
        .layer(cors_layer)
        .layer(middleware::from_fn_with_state(routes, route_plain_options))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
}
