//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::book::BookRepository;
use crate::domain::{Book, DomainError, DomainResult};
use crate::infrastructure::database::entities::book;

pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn book_model_to_domain(m: book::Model) -> Book {
    Book {
        id: m.id,
        title: m.title,
        description: m.description,
        author_id: m.author_id,
    }
}

fn book_to_active(b: Book) -> book::ActiveModel {
    book::ActiveModel {
        id: Set(b.id),
        title: Set(b.title),
        description: Set(b.description),
        author_id: Set(b.author_id),
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn list_for_author(&self, author_id: Uuid) -> DomainResult<Vec<Book>> {
        let models = book::Entity::find()
            .filter(book::Column::AuthorId.eq(author_id))
            .order_by_asc(book::Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(book_model_to_domain).collect())
    }

    async fn find_for_author(&self, author_id: Uuid, book_id: Uuid) -> DomainResult<Option<Book>> {
        let model = book::Entity::find_by_id(book_id)
            .filter(book::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(book_model_to_domain))
    }

    async fn create(&self, b: Book) -> DomainResult<Book> {
        let taken = book::Entity::find_by_id(b.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if taken.is_some() {
            return Err(DomainError::Conflict(format!("Book {} already exists", b.id)));
        }

        let model = book_to_active(b).insert(&self.db).await.map_err(db_err)?;
        Ok(book_model_to_domain(model))
    }

    async fn update(&self, b: Book) -> DomainResult<Book> {
        let id = b.id;
        match book_to_active(b).update(&self.db).await {
            Ok(model) => Ok(book_model_to_domain(model)),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::not_found("Book", "id", id)),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn delete(&self, book_id: Uuid) -> DomainResult<bool> {
        let result = book::Entity::delete_by_id(book_id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
