//! Author collection DTOs

use serde::Deserialize;
use validator::Validate;

use crate::interfaces::http::modules::authors::AuthorForCreationDto;

/// A JSON array of authors to create in one request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(transparent)]
pub struct AuthorCollectionForCreationDto {
    #[validate(nested)]
    pub authors: Vec<AuthorForCreationDto>,
}
