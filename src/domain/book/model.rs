//! Book domain entity

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
}

impl Book {
    pub fn from_new(id: Uuid, author_id: Uuid, book: NewBook) -> Self {
        Self {
            id,
            title: book.title,
            description: book.description,
            author_id,
        }
    }
}
