//! Author use-cases

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::query::{PropertyMappingService, ResourceQueryParameters};
use crate::domain::{Author, DomainError, DomainResult, NewAuthor, RepositoryProvider};
use crate::shared::PagedList;

#[derive(Clone)]
pub struct AuthorService {
    repos: Arc<dyn RepositoryProvider>,
    mappings: Arc<PropertyMappingService>,
}

impl AuthorService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, mappings: Arc<PropertyMappingService>) -> Self {
        Self { repos, mappings }
    }

    /// Filter, search, sort and page the authors as described by `params`.
    pub async fn list(&self, params: &ResourceQueryParameters) -> DomainResult<PagedList<Author>> {
        let sort = self
            .mappings
            .authors()
            .sort_clauses(&params.order_by)
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        self.repos
            .authors()
            .list(
                &params.author_filter(),
                &sort,
                params.page_number,
                params.page_size(),
            )
            .await
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Author> {
        self.repos
            .authors()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Author", "id", id))
    }

    pub async fn create(&self, author: NewAuthor) -> DomainResult<Author> {
        let created = self.repos.authors().create(author).await?;
        info!(author_id = %created.id, "Author created");
        Ok(created)
    }

    /// Create every author in one transaction.
    pub async fn create_collection(&self, authors: Vec<NewAuthor>) -> DomainResult<Vec<Author>> {
        let created = self.repos.authors().create_many(authors).await?;
        info!(count = created.len(), "Author collection created");
        Ok(created)
    }

    /// Authors in the order of `ids`. Fails if any id is unknown.
    pub async fn get_collection(&self, ids: &[Uuid]) -> DomainResult<Vec<Author>> {
        let mut seen = HashSet::new();
        let distinct: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let found = self.repos.authors().find_by_ids(&distinct).await?;
        if found.len() != distinct.len() {
            let missing = distinct
                .iter()
                .find(|id| !found.iter().any(|a| a.id == **id))
                .map(Uuid::to_string)
                .unwrap_or_default();
            return Err(DomainError::not_found("Author", "id", missing));
        }

        Ok(distinct
            .iter()
            .filter_map(|id| found.iter().find(|a| a.id == *id).cloned())
            .collect())
    }

    /// Outcome of posting to an author's own URI: authors cannot be created
    /// with a client-chosen id, so this is always an error.
    pub async fn block_creation(&self, id: Uuid) -> DomainResult<()> {
        if self.repos.authors().exists(id).await? {
            Err(DomainError::Conflict(format!("Author {id} already exists")))
        } else {
            Err(DomainError::not_found("Author", "id", id))
        }
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !self.repos.authors().delete(id).await? {
            return Err(DomainError::not_found("Author", "id", id));
        }
        info!(author_id = %id, "Author {} was deleted.", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::seed::seed_demo_data;
    use crate::infrastructure::{init_and_migrate, DatabaseConfig, SeaOrmRepositoryProvider};

    async fn service() -> AuthorService {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        seed_demo_data(repos.as_ref()).await.unwrap();
        AuthorService::new(repos, Arc::new(PropertyMappingService::new()))
    }

    fn params(pairs: &[(&str, &str)]) -> ResourceQueryParameters {
        ResourceQueryParameters::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn unknown_order_by_is_a_validation_error() {
        let service = service().await;
        let err = service
            .list(&params(&[("orderBy", "shoeSize")]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn collection_keeps_request_order_and_drops_duplicates() {
        let service = service().await;
        let page = service.list(&params(&[])).await.unwrap();
        let first = page.items()[0].id;
        let last = page.items()[5].id;

        let authors = service.get_collection(&[last, first, last]).await.unwrap();
        assert_eq!(
            authors.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![last, first]
        );

        let err = service
            .get_collection(&[first, Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn block_creation_distinguishes_existing_authors() {
        let service = service().await;
        let id = service.list(&params(&[])).await.unwrap().items()[0].id;

        assert!(matches!(
            service.block_creation(id).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            service.block_creation(Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
