//! Authors module: paged author lists, single authors and their creation

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
