//! Author repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Author, AuthorField, AuthorFilter, NewAuthor};
use crate::domain::{DomainError, DomainResult};
use crate::shared::{PagedList, SortClause};

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Filter, order, then page. Invalid paging arguments fail with
    /// [`DomainError::Paging`](crate::domain::DomainError::Paging).
    async fn list(
        &self,
        filter: &AuthorFilter,
        sort: &[SortClause<AuthorField>],
        page_number: i64,
        page_size: i64,
    ) -> DomainResult<PagedList<Author>>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Author>>;
    /// Authors whose id is in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Author>>;
    async fn exists(&self, id: Uuid) -> DomainResult<bool>;
    async fn count(&self) -> DomainResult<u64>;
    /// Insert the authors and their books in one transaction.
    async fn create_many(&self, authors: Vec<NewAuthor>) -> DomainResult<Vec<Author>>;

    async fn create(&self, author: NewAuthor) -> DomainResult<Author> {
        self.create_many(vec![author])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Database("insert returned no author".into()))
    }
    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;
}
