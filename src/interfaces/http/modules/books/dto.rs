//! Book DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::{Book, NewBook};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

impl From<Book> for BookDto {
    fn from(b: Book) -> Self {
        Self {
            id: b.id,
            title: b.title,
            description: b.description,
            author_id: b.author_id,
        }
    }
}

fn title_differs_from_description(
    title: &Option<String>,
    description: &Option<String>,
) -> Result<(), ValidationError> {
    if title.is_some() && title == description {
        let mut err = ValidationError::new("title_equals_description");
        err.message = Some("The provided description should be different from the title.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_creation"))]
pub struct BookForCreationDto {
    #[validate(
        required(message = "You should fill out a title."),
        length(min = 1, max = 100, message = "The title shouldn't have more than 100 characters.")
    )]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "The description shouldn't have more than 500 characters."))]
    pub description: Option<String>,
}

fn validate_creation(dto: &BookForCreationDto) -> Result<(), ValidationError> {
    title_differs_from_description(&dto.title, &dto.description)
}

impl From<BookForCreationDto> for NewBook {
    fn from(dto: BookForCreationDto) -> Self {
        Self {
            title: dto.title.unwrap_or_default(),
            description: dto.description,
        }
    }
}

/// Full replacement of a book. Unlike creation, the description is required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update"))]
pub struct BookForUpdateDto {
    #[validate(
        required(message = "You should fill out a title."),
        length(min = 1, max = 100, message = "The title shouldn't have more than 100 characters.")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "You should fill out a description."),
        length(max = 500, message = "The description shouldn't have more than 500 characters.")
    )]
    pub description: Option<String>,
}

fn validate_update(dto: &BookForUpdateDto) -> Result<(), ValidationError> {
    title_differs_from_description(&dto.title, &dto.description)
}

impl From<BookForUpdateDto> for NewBook {
    fn from(dto: BookForUpdateDto) -> Self {
        Self {
            title: dto.title.unwrap_or_default(),
            description: dto.description,
        }
    }
}
