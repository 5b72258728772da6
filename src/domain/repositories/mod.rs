//! Repository traits for the domain layer

use super::author::AuthorRepository;
use super::book::BookRepository;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let author = repos.authors().find_by_id(id).await?;
///     let books = repos.books().list_for_author(id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn authors(&self) -> &dyn AuthorRepository;
    fn books(&self) -> &dyn BookRepository;
}
