//! Books module: the books of one author

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
