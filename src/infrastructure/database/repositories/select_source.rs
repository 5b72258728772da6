//! Deferred SeaORM query as a page source.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect, Select};

use super::db_err;
use crate::domain::DomainError;
use crate::shared::PageSource;

/// A filtered and ordered `Select` that is counted and sliced on demand.
///
/// Both passes run a clone of the same statement, so the count and the
/// page always agree on filter and order.
pub struct SelectSource<'a, E: EntityTrait> {
    select: Select<E>,
    db: &'a DatabaseConnection,
}

impl<'a, E: EntityTrait> SelectSource<'a, E> {
    pub fn new(select: Select<E>, db: &'a DatabaseConnection) -> Self {
        Self { select, db }
    }
}

#[async_trait]
impl<'a, E> PageSource for SelectSource<'a, E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    type Item = E::Model;
    type Error = DomainError;

    async fn count(&self) -> Result<u64, DomainError> {
        self.select.clone().count(self.db).await.map_err(db_err)
    }

    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<E::Model>, DomainError> {
        self.select
            .clone()
            .offset(offset)
            .limit(limit)
            .all(self.db)
            .await
            .map_err(db_err)
    }
}
