//! Feature modules, one per resource

pub mod author_collections;
pub mod authors;
pub mod books;
pub mod health;
pub mod root;
