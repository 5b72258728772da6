//! Author DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::application::ShapeableResource;
use crate::domain::{Author, NewAuthor};
use crate::interfaces::http::common::LinkDto;
use crate::interfaces::http::modules::books::BookForCreationDto;

/// Outer representation of an author: names are joined and the birth date
/// is replaced by the age.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub genre: String,
}

impl ShapeableResource for AuthorDto {
    const FIELDS: &'static [&'static str] = &["id", "name", "age", "genre"];
}

impl From<Author> for AuthorDto {
    fn from(a: Author) -> Self {
        Self {
            id: a.id,
            name: a.full_name(),
            age: a.current_age(),
            genre: a.genre,
        }
    }
}

/// Author plus its hypermedia links, as returned after creation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorWithLinksDto {
    #[serde(flatten)]
    pub author: AuthorDto,
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreationDto {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    pub date_of_birth: DateTime<Utc>,

    #[validate(length(min = 1, max = 50, message = "Genre must be 1-50 characters"))]
    pub genre: String,

    #[serde(default)]
    #[validate(nested)]
    pub books: Vec<BookForCreationDto>,
}

impl From<AuthorForCreationDto> for NewAuthor {
    fn from(dto: AuthorForCreationDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            date_of_birth: dto.date_of_birth,
            date_of_death: None,
            genre: dto.genre,
            books: dto.books.into_iter().map(Into::into).collect(),
        }
    }
}

/// Creation body accepted under the
/// `application/vnd.marvin.authorwithdateofdeath.full+json` content type.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_lifespan"))]
pub struct AuthorForCreationWithDateOfDeathDto {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    pub date_of_birth: DateTime<Utc>,

    pub date_of_death: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 50, message = "Genre must be 1-50 characters"))]
    pub genre: String,

    #[serde(default)]
    #[validate(nested)]
    pub books: Vec<BookForCreationDto>,
}

fn validate_lifespan(dto: &AuthorForCreationWithDateOfDeathDto) -> Result<(), ValidationError> {
    match dto.date_of_death {
        Some(death) if death < dto.date_of_birth => {
            let mut err = ValidationError::new("death_before_birth");
            err.message = Some("The date of death can't be before the date of birth.".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

impl From<AuthorForCreationWithDateOfDeathDto> for NewAuthor {
    fn from(dto: AuthorForCreationWithDateOfDeathDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            date_of_birth: dto.date_of_birth,
            date_of_death: dto.date_of_death,
            genre: dto.genre,
            books: dto.books.into_iter().map(Into::into).collect(),
        }
    }
}
