pub mod author;
pub mod book;
pub mod repositories;

// Re-export commonly used types
pub use author::{Author, AuthorField, AuthorFilter, AuthorRepository, NewAuthor};
pub use book::{Book, BookRepository, NewBook};
pub use repositories::RepositoryProvider;

pub use crate::shared::errors::{DomainError, DomainResult};
