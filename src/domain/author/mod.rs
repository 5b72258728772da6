//! Author aggregate
//!
//! An author and the books written by them. Deleting an author deletes
//! their books.

pub mod model;
pub mod repository;

pub use model::{Author, AuthorField, AuthorFilter, NewAuthor};
pub use repository::AuthorRepository;
