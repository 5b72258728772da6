//! HTTP middleware and request-routing constraints
//!
//! - `request_id`: `X-Request-Id` correlation
//! - `media_type`: header-matching action constraints and dispatch
//! - `negotiation`: `Accept` header negotiation (406)
//! - `cache_headers`: ETag / Cache-Control / conditional requests
//! - `rate_limit`: per-IP rate limiting layers

pub mod cache_headers;
pub mod media_type;
pub mod negotiation;
pub mod rate_limit;
pub mod request_id;

pub use cache_headers::{cache_headers_middleware, strong_etag, CacheHeadersState};
pub use media_type::{
    header_matches_media_type, ActionConstraint, ConstrainedHandlers,
    RequestHeaderMatchesMediaType,
};
pub use negotiation::{media_types, negotiate, wants_hateoas, OutputFormat};
pub use rate_limit::apply_rate_limits;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
