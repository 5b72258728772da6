//! Book aggregate

pub mod model;
pub mod repository;

pub use model::{Book, NewBook};
pub use repository::BookRepository;
