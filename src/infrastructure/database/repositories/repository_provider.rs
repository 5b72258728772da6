//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::author::AuthorRepository;
use crate::domain::book::BookRepository;
use crate::domain::repositories::RepositoryProvider;

use super::author_repository::SeaOrmAuthorRepository;
use super::book_repository::SeaOrmBookRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let author = repos.authors().find_by_id(id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    authors: SeaOrmAuthorRepository,
    books: SeaOrmBookRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            authors: SeaOrmAuthorRepository::new(db.clone()),
            books: SeaOrmBookRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn authors(&self) -> &dyn AuthorRepository {
        &self.authors
    }

    fn books(&self) -> &dyn BookRepository {
        &self.books
    }
}
