//! Author collections: creating and fetching several authors at once

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
