//! Author and book use-cases.
//!
//! HTTP handlers stay thin and delegate to these services.

pub mod authors;
pub mod books;

pub use authors::AuthorService;
pub use books::{BookService, UpsertOutcome};
