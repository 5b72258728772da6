//! Database entities module

pub mod author;
pub mod book;

pub use author::Entity as AuthorEntity;
pub use book::Entity as BookEntity;
