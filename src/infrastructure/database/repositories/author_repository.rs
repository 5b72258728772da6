//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::{db_err, SelectSource};
use crate::domain::author::AuthorRepository;
use crate::domain::{Author, AuthorField, AuthorFilter, DomainResult, NewAuthor};
use crate::infrastructure::database::entities::{author, book};
use crate::shared::{PagedList, SortClause, SortDirection};

pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn author_model_to_domain(m: author::Model) -> Author {
    Author {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        date_of_birth: m.date_of_birth,
        date_of_death: m.date_of_death,
        genre: m.genre,
    }
}

fn field_to_column(field: AuthorField) -> author::Column {
    match field {
        AuthorField::Id => author::Column::Id,
        AuthorField::FirstName => author::Column::FirstName,
        AuthorField::LastName => author::Column::LastName,
        AuthorField::DateOfBirth => author::Column::DateOfBirth,
        AuthorField::Genre => author::Column::Genre,
    }
}

fn lower(column: author::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `text` anywhere, with `%`, `_` and the escape
/// character taken literally.
fn contains_pattern(text: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

// ── Query building ──────────────────────────────────────────────

fn filtered(filter: &AuthorFilter) -> Select<author::Entity> {
    let mut query = author::Entity::find();

    if let Some(genre) = filter.genre() {
        query = query.filter(lower(author::Column::Genre).eq(genre));
    }

    if let Some(search) = filter.search_query() {
        query = query.filter(
            Condition::any()
                .add(lower(author::Column::Genre).like(contains_pattern(search)))
                .add(lower(author::Column::FirstName).like(contains_pattern(search)))
                .add(lower(author::Column::LastName).like(contains_pattern(search))),
        );
    }

    query
}

fn sorted(
    mut query: Select<author::Entity>,
    sort: &[SortClause<AuthorField>],
) -> Select<author::Entity> {
    for clause in sort {
        let column = field_to_column(clause.field);
        query = match clause.direction {
            SortDirection::Ascending => query.order_by_asc(column),
            SortDirection::Descending => query.order_by_desc(column),
        };
    }
    // Keeps pages stable when the requested keys tie.
    query.order_by_asc(author::Column::Id)
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn list(
        &self,
        filter: &AuthorFilter,
        sort: &[SortClause<AuthorField>],
        page_number: i64,
        page_size: i64,
    ) -> DomainResult<PagedList<Author>> {
        let query = sorted(filtered(filter), sort);
        let source = SelectSource::new(query, &self.db);

        let page = PagedList::create(&source, page_number, page_size).await?;
        debug!(
            total = page.total_count(),
            page = page.current_page(),
            "Author page loaded"
        );

        Ok(page.map(author_model_to_domain))
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Author>> {
        let model = author::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(author_model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Author>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = author::Entity::find()
            .filter(author::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(author_model_to_domain).collect())
    }

    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        let count = author::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn count(&self) -> DomainResult<u64> {
        author::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn create_many(&self, authors: Vec<NewAuthor>) -> DomainResult<Vec<Author>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut created = Vec::with_capacity(authors.len());

        for new_author in authors {
            let author_id = Uuid::new_v4();
            let model = author::ActiveModel {
                id: Set(author_id),
                first_name: Set(new_author.first_name),
                last_name: Set(new_author.last_name),
                date_of_birth: Set(new_author.date_of_birth),
                date_of_death: Set(new_author.date_of_death),
                genre: Set(new_author.genre),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;

            for new_book in new_author.books {
                book::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    title: Set(new_book.title),
                    description: Set(new_book.description),
                    author_id: Set(author_id),
                }
                .insert(&txn)
                .await
                .map_err(db_err)?;
            }

            created.push(author_model_to_domain(model));
        }

        txn.commit().await.map_err(db_err)?;
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        book::Entity::delete_many()
            .filter(book::Column::AuthorId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = author::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{DomainError, NewBook};
    use crate::infrastructure::database::{init_and_migrate, DatabaseConfig};
    use crate::shared::PagingError;

    fn new_author(first: &str, last: &str, year: i32, genre: &str) -> NewAuthor {
        NewAuthor {
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            date_of_death: None,
            genre: genre.into(),
            books: Vec::new(),
        }
    }

    async fn repo_with(authors: Vec<NewAuthor>) -> SeaOrmAuthorRepository {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        let repo = SeaOrmAuthorRepository::new(db);
        repo.create_many(authors).await.unwrap();
        repo
    }

    fn names(page: &PagedList<Author>) -> Vec<String> {
        page.iter().map(Author::full_name).collect()
    }

    #[tokio::test]
    async fn filters_by_genre_case_insensitively() {
        let repo = repo_with(vec![
            new_author("Stephen", "King", 1947, "Horror"),
            new_author("Neil", "Gaiman", 1960, "Fantasy"),
            new_author("Jens", "Lapidus", 1974, "Thriller"),
        ])
        .await;

        let filter = AuthorFilter::new(Some(" fantasy "), None);
        let page = repo.list(&filter, &[], 1, 10).await.unwrap();

        assert_eq!(names(&page), vec!["Neil Gaiman"]);
        assert_eq!(page.total_count(), 1);
    }

    #[tokio::test]
    async fn search_matches_genre_and_names() {
        let repo = repo_with(vec![
            new_author("Stephen", "King", 1947, "Horror"),
            new_author("Neil", "Gaiman", 1960, "Fantasy"),
            new_author("Douglas", "Adams", 1952, "Science fiction"),
        ])
        .await;

        let sort = [SortClause::new(AuthorField::FirstName, SortDirection::Ascending)];
        let by_name = repo
            .list(&AuthorFilter::new(None, Some("ADAM")), &sort, 1, 10)
            .await
            .unwrap();
        assert_eq!(names(&by_name), vec!["Douglas Adams"]);

        let by_genre = repo
            .list(&AuthorFilter::new(None, Some("o")), &sort, 1, 10)
            .await
            .unwrap();
        assert_eq!(names(&by_genre), vec!["Douglas Adams", "Stephen King"]);
    }

    async fn search(repo: &SeaOrmAuthorRepository, text: &str) -> Vec<String> {
        let page = repo
            .list(&AuthorFilter::new(None, Some(text)), &[], 1, 10)
            .await
            .unwrap();
        names(&page)
    }

    #[tokio::test]
    async fn search_wildcards_are_literal() {
        let repo = repo_with(vec![
            new_author("Stephen", "King", 1947, "Horror"),
            new_author("Jean_Paul", "Sartre", 1905, "100% Philosophy"),
        ])
        .await;

        assert_eq!(search(&repo, "_").await, vec!["Jean_Paul Sartre"]);
        assert_eq!(search(&repo, "%").await, vec!["Jean_Paul Sartre"]);
        assert!(search(&repo, "e_n").await.is_empty());
        assert!(search(&repo, "\\").await.is_empty());
    }

    #[tokio::test]
    async fn sorts_then_pages() {
        let repo = repo_with(vec![
            new_author("Cecil", "C", 1950, "Drama"),
            new_author("Anna", "A", 1970, "Drama"),
            new_author("Bert", "B", 1960, "Drama"),
        ])
        .await;

        let sort = [SortClause::new(AuthorField::DateOfBirth, SortDirection::Descending)];
        let first = repo.list(&AuthorFilter::default(), &sort, 1, 2).await.unwrap();
        let second = repo.list(&AuthorFilter::default(), &sort, 2, 2).await.unwrap();

        assert_eq!(names(&first), vec!["Anna A", "Bert B"]);
        assert_eq!(names(&second), vec!["Cecil C"]);
        assert_eq!(second.total_pages(), 2);
        assert!(!second.has_next());
    }

    #[tokio::test]
    async fn invalid_page_size_is_a_paging_error() {
        let repo = repo_with(Vec::new()).await;
        let err = repo.list(&AuthorFilter::default(), &[], 1, 0).await.unwrap_err();
        assert!(matches!(err, DomainError::Paging(PagingError::InvalidPageSize(0))));
    }

    #[tokio::test]
    async fn delete_removes_author_and_books() {
        let mut author = new_author("Tom", "Lanoye", 1958, "Various");
        author.books.push(NewBook {
            title: "Speechless".into(),
            description: None,
        });
        let repo = repo_with(Vec::new()).await;
        let created = repo.create(author).await.unwrap();

        assert!(repo.exists(created.id).await.unwrap());
        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.exists(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());

        let remaining = book::Entity::find().count(&repo.db).await.unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown_ids() {
        let repo = repo_with(Vec::new()).await;
        let a = repo.create(new_author("A", "A", 1980, "X")).await.unwrap();

        let found = repo.find_by_ids(&[a.id, Uuid::new_v4()]).await.unwrap();
        assert_eq!(found, vec![a]);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
