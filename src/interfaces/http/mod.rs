//! HTTP REST API interfaces
//!
//! - `common`: error body, extractors and links shared by all handlers
//! - `middleware`: request id, negotiation, cache headers, rate limits
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, LibraryState};
