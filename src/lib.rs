//! # Library API
//!
//! REST API over authors and their books, with paging, filtering,
//! searching, sorting, data shaping, content negotiation, HTTP cache
//! headers and per-IP rate limiting.
//!
//! ## Architecture
//!
//! - **domain**: entities, filters and repository traits
//! - **application**: query parameters, sort mapping, shaping and services
//! - **infrastructure**: sea-orm persistence, migrations and demo data
//! - **interfaces**: axum router, middleware and handlers
//! - **shared**: paging, sorting, errors and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_and_migrate, init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
