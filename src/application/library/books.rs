//! Book use-cases. Every operation is scoped to an existing author.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{Book, DomainError, DomainResult, NewBook, RepositoryProvider};

/// Result of a PUT on a book URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(Book),
    Updated(Book),
}

#[derive(Clone)]
pub struct BookService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn ensure_author(&self, author_id: Uuid) -> DomainResult<()> {
        if self.repos.authors().exists(author_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Author", "id", author_id))
        }
    }

    pub async fn list(&self, author_id: Uuid) -> DomainResult<Vec<Book>> {
        self.ensure_author(author_id).await?;
        self.repos.books().list_for_author(author_id).await
    }

    pub async fn get(&self, author_id: Uuid, book_id: Uuid) -> DomainResult<Book> {
        self.ensure_author(author_id).await?;
        self.repos
            .books()
            .find_for_author(author_id, book_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Book", "id", book_id))
    }

    pub async fn create(&self, author_id: Uuid, book: NewBook) -> DomainResult<Book> {
        self.ensure_author(author_id).await?;
        let book = Book::from_new(Uuid::new_v4(), author_id, book);
        let created = self.repos.books().create(book).await?;
        info!(author_id = %author_id, book_id = %created.id, "Book created");
        Ok(created)
    }

    /// Replace the book, or create it under the given id when it does not
    /// exist for this author.
    pub async fn upsert(
        &self,
        author_id: Uuid,
        book_id: Uuid,
        book: NewBook,
    ) -> DomainResult<UpsertOutcome> {
        self.ensure_author(author_id).await?;
        let existing = self
            .repos
            .books()
            .find_for_author(author_id, book_id)
            .await?;
        let book = Book::from_new(book_id, author_id, book);

        match existing {
            Some(_) => Ok(UpsertOutcome::Updated(self.repos.books().update(book).await?)),
            None => {
                let created = self.repos.books().create(book).await?;
                info!(author_id = %author_id, book_id = %book_id, "Book upserted");
                Ok(UpsertOutcome::Created(created))
            }
        }
    }

    pub async fn delete(&self, author_id: Uuid, book_id: Uuid) -> DomainResult<()> {
        self.get(author_id, book_id).await?;
        self.repos.books().delete(book_id).await?;
        info!(
            author_id = %author_id,
            book_id = %book_id,
            "Book {} for author {} was deleted.",
            book_id,
            author_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::seed::seed_demo_data;
    use crate::infrastructure::{init_and_migrate, DatabaseConfig, SeaOrmRepositoryProvider};
    use crate::shared::SortClause;

    async fn setup() -> (BookService, Uuid, Uuid) {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));
        seed_demo_data(repos.as_ref()).await.unwrap();

        let no_sort: &[SortClause<crate::domain::AuthorField>] = &[];
        let page = repos
            .authors()
            .list(&Default::default(), no_sort, 1, 2)
            .await
            .unwrap();
        let ids = (page.items()[0].id, page.items()[1].id);
        (BookService::new(repos), ids.0, ids.1)
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            description: Some("A description".to_string()),
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_updates() {
        let (service, author, _) = setup().await;
        let id = Uuid::new_v4();

        let created = service.upsert(author, id, new_book("First")).await.unwrap();
        assert!(matches!(created, UpsertOutcome::Created(ref b) if b.id == id));

        let updated = service.upsert(author, id, new_book("Second")).await.unwrap();
        assert!(matches!(updated, UpsertOutcome::Updated(ref b) if b.title == "Second"));
        assert_eq!(service.get(author, id).await.unwrap().title, "Second");
    }

    #[tokio::test]
    async fn books_are_scoped_to_their_author() {
        let (service, author, other) = setup().await;
        let book = service.create(author, new_book("Mine")).await.unwrap();

        assert!(matches!(
            service.get(other, book.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(other, book.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.list(Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));

        service.delete(author, book.id).await.unwrap();
        assert!(service.get(author, book.id).await.is_err());
    }
}
