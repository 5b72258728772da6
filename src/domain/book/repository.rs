//! Book repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Book;
use crate::domain::DomainResult;

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list_for_author(&self, author_id: Uuid) -> DomainResult<Vec<Book>>;
    async fn find_for_author(&self, author_id: Uuid, book_id: Uuid) -> DomainResult<Option<Book>>;
    /// Insert `book` with its own id. Fails with `Conflict` if the id is taken.
    async fn create(&self, book: Book) -> DomainResult<Book>;
    async fn update(&self, book: Book) -> DomainResult<Book>;
    async fn delete(&self, book_id: Uuid) -> DomainResult<bool>;
}
