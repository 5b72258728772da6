//! API root document

pub mod handlers;

pub use handlers::*;
