//! Author domain entity

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::book::NewBook;

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub genre: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on `today`, or at the date of death if there is one.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let until = self
            .date_of_death
            .map(|d| d.date_naive())
            .unwrap_or(today);
        let born = self.date_of_birth.date_naive();

        let mut age = until.year() - born.year();
        if (until.month(), until.day()) < (born.month(), born.day()) {
            age -= 1;
        }
        age
    }

    pub fn current_age(&self) -> i32 {
        self.age_on(Utc::now().date_naive())
    }
}

/// An author to be created together with their initial books.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub date_of_death: Option<DateTime<Utc>>,
    pub genre: String,
    pub books: Vec<NewBook>,
}

/// Stored author attributes that list queries can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorField {
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Genre,
}

/// Filtering applied to author lists before paging.
///
/// Values are trimmed and ASCII lower-cased, the same folding SQLite's
/// `lower()` applies to the stored columns; blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    genre: Option<String>,
    search_query: Option<String>,
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}

impl AuthorFilter {
    pub fn new(genre: Option<&str>, search_query: Option<&str>) -> Self {
        Self {
            genre: normalized(genre),
            search_query: normalized(search_query),
        }
    }

    /// Exact (case-insensitive) genre match.
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Substring searched in genre, first name and last name.
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn author(born: (i32, u32, u32), died: Option<(i32, u32, u32)>) -> Author {
        let at = |(y, m, d): (i32, u32, u32)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();
        Author {
            id: Uuid::new_v4(),
            first_name: "Stephen".into(),
            last_name: "King".into(),
            date_of_birth: at(born),
            date_of_death: died.map(at),
            genre: "Horror".into(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_name_joins_first_and_last() {
        assert_eq!(author((1947, 9, 21), None).full_name(), "Stephen King");
    }

    #[test]
    fn age_before_and_after_birthday() {
        let a = author((1947, 9, 21), None);
        assert_eq!(a.age_on(day(2020, 9, 20)), 72);
        assert_eq!(a.age_on(day(2020, 9, 21)), 73);
    }

    #[test]
    fn age_stops_at_date_of_death() {
        let a = author((1952, 3, 11), Some((2001, 5, 11)));
        assert_eq!(a.age_on(day(2030, 1, 1)), 49);
    }

    #[test]
    fn filter_normalizes_and_drops_blank_values() {
        let f = AuthorFilter::new(Some("  Horror "), Some("   "));
        assert_eq!(f.genre(), Some("horror"));
        assert_eq!(f.search_query(), None);

        let accented = AuthorFilter::new(Some("ÉPOPÉE"), None);
        assert_eq!(accented.genre(), Some("ÉpopÉe"));
    }
}
