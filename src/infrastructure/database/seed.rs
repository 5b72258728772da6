//! Demo data loaded into an empty database at startup.

use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use crate::domain::{DomainError, DomainResult, NewAuthor, NewBook, RepositoryProvider};

fn born(year: i32, month: u32, day: u32) -> DomainResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| DomainError::Validation(format!("invalid date {year}-{month}-{day}")))
}

fn book(title: &str, description: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        description: Some(description.to_string()),
    }
}

fn author(
    first_name: &str,
    last_name: &str,
    date_of_birth: DateTime<Utc>,
    genre: &str,
    books: Vec<NewBook>,
) -> NewAuthor {
    NewAuthor {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth,
        date_of_death: None,
        genre: genre.to_string(),
        books,
    }
}

pub fn demo_authors() -> DomainResult<Vec<NewAuthor>> {
    Ok(vec![
        author(
            "Stephen",
            "King",
            born(1947, 9, 21)?,
            "Horror",
            vec![
                book("The Shining", "A horror novel set in an isolated mountain hotel."),
                book("Misery", "A novelist is held captive by his self-proclaimed number one fan."),
                book("It", "Seven children are terrorized by a shape-shifting entity."),
                book("The Stand", "A post-apocalyptic fantasy novel."),
            ],
        ),
        author(
            "George",
            "RR Martin",
            born(1948, 9, 20)?,
            "Fantasy",
            vec![
                book("A Game of Thrones", "The first novel in A Song of Ice and Fire."),
                book("The Winds of Winter", "The forthcoming sixth novel in the series."),
                book("A Dance with Dragons", "The fifth of seven planned novels in the series."),
            ],
        ),
        author(
            "Neil",
            "Gaiman",
            born(1960, 11, 10)?,
            "Fantasy",
            vec![
                book("American Gods", "Old and new gods wage war across America."),
                book("The Ocean at the End of the Lane", "A man returns to his childhood home."),
            ],
        ),
        author(
            "Tom",
            "Lanoye",
            born(1958, 8, 27)?,
            "Various",
            vec![
                book("Speechless", "A writer tries to make sense of his mother's decline."),
                book("Boze Tongen", "A collection of columns and essays."),
            ],
        ),
        author(
            "Douglas",
            "Adams",
            born(1952, 3, 11)?,
            "Science fiction",
            vec![book(
                "The Hitchhiker's Guide to the Galaxy",
                "A comic science fiction series.",
            )],
        ),
        author(
            "Jens",
            "Lapidus",
            born(1974, 5, 24)?,
            "Thriller",
            vec![book(
                "Easy Money or Snabba cash",
                "A thriller set in the Stockholm underworld.",
            )],
        ),
    ])
}

/// Insert the demo authors when no author exists yet. Returns how many
/// authors were added.
pub async fn seed_demo_data(repos: &dyn RepositoryProvider) -> DomainResult<usize> {
    if repos.authors().count().await? > 0 {
        return Ok(0);
    }

    info!("Seeding demo authors and books...");
    let created = repos.authors().create_many(demo_authors()?).await?;
    info!("Seeded {} authors", created.len());
    Ok(created.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::{init_and_migrate, DatabaseConfig};

    #[tokio::test]
    async fn seeds_only_an_empty_database() {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        let repos = SeaOrmRepositoryProvider::new(db);

        assert_eq!(seed_demo_data(&repos).await.unwrap(), 6);
        assert_eq!(seed_demo_data(&repos).await.unwrap(), 0);
        assert_eq!(repos.authors().count().await.unwrap(), 6);
    }
}
