//! Paging, filtering, sorting and shaping parameters of a list request.

use thiserror::Error;

use crate::domain::AuthorFilter;

/// Upper bound applied to every requested page size.
pub const MAX_PAGE_SIZE: i64 = 20;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_ORDER_BY: &str = "Name";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("The value '{value}' is not valid for {name}.")]
    InvalidNumber { name: &'static str, value: String },
}

/// Parameters of a collection request.
///
/// `page_size` is only reachable through [`set_page_size`](Self::set_page_size),
/// which caps it at [`MAX_PAGE_SIZE`]. Non-positive values are kept as-is
/// and rejected later, when the page is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQueryParameters {
    pub page_number: i64,
    page_size: i64,
    pub genre: Option<String>,
    pub search_query: Option<String>,
    pub order_by: String,
    pub fields: Option<String>,
}

impl Default for ResourceQueryParameters {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            genre: None,
            search_query: None,
            order_by: DEFAULT_ORDER_BY.to_string(),
            fields: None,
        }
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<i64, ParameterError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParameterError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}

impl ResourceQueryParameters {
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn set_page_size(&mut self, requested: i64) {
        self.page_size = requested.min(MAX_PAGE_SIZE);
    }

    /// Bind from decoded query-string pairs. Names match case-insensitively;
    /// unknown names are ignored and a repeated name keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref().to_ascii_lowercase().as_str() {
                "pagenumber" => params.page_number = parse_number("pageNumber", value)?,
                "pagesize" => params.set_page_size(parse_number("pageSize", value)?),
                "genre" => params.genre = Some(value.to_string()),
                "searchquery" => params.search_query = Some(value.to_string()),
                "orderby" => params.order_by = value.to_string(),
                "fields" => params.fields = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(params)
    }

    pub fn author_filter(&self) -> AuthorFilter {
        AuthorFilter::new(self.genre.as_deref(), self.search_query.as_deref())
    }

    /// Same parameters pointing at another page.
    pub fn for_page(&self, page_number: i64) -> Self {
        Self {
            page_number,
            ..self.clone()
        }
    }

    /// Query string (without `?`) reproducing these parameters. Absent
    /// optional values are omitted.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::with_capacity(6);
        if let Some(fields) = &self.fields {
            pairs.push(("fields", fields.clone()));
        }
        pairs.push(("orderBy", self.order_by.clone()));
        if let Some(search_query) = &self.search_query {
            pairs.push(("searchQuery", search_query.clone()));
        }
        if let Some(genre) = &self.genre {
            pairs.push(("genre", genre.clone()));
        }
        pairs.push(("pageNumber", self.page_number.to_string()));
        pairs.push(("pageSize", self.page_size.to_string()));

        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, encode_component(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = ResourceQueryParameters::default();
        assert_eq!(p.page_number, 1);
        assert_eq!(p.page_size(), 10);
        assert_eq!(p.order_by, "Name");
        assert!(p.genre.is_none() && p.search_query.is_none() && p.fields.is_none());
    }

    #[test]
    fn page_size_is_capped_at_maximum() {
        let mut p = ResourceQueryParameters::default();
        for v in [1, 5, 19, 20] {
            p.set_page_size(v);
            assert_eq!(p.page_size(), v);
        }
        p.set_page_size(50);
        assert_eq!(p.page_size(), 20);
        p.set_page_size(i64::MAX);
        assert_eq!(p.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn non_positive_page_size_is_not_floored() {
        let mut p = ResourceQueryParameters::default();
        p.set_page_size(0);
        assert_eq!(p.page_size(), 0);
        p.set_page_size(-4);
        assert_eq!(p.page_size(), -4);
    }

    #[test]
    fn binds_names_case_insensitively() {
        let p = ResourceQueryParameters::from_pairs([
            ("PAGENUMBER", "2"),
            ("pagesize", "50"),
            ("Genre", "Fantasy"),
            ("searchQuery", "king"),
            ("ORDERBY", "age desc"),
            ("fields", "id,name"),
            ("unrelated", "x"),
        ])
        .unwrap();

        assert_eq!(p.page_number, 2);
        assert_eq!(p.page_size(), 20);
        assert_eq!(p.genre.as_deref(), Some("Fantasy"));
        assert_eq!(p.search_query.as_deref(), Some("king"));
        assert_eq!(p.order_by, "age desc");
        assert_eq!(p.fields.as_deref(), Some("id,name"));
    }

    #[test]
    fn non_numeric_page_values_fail_binding() {
        let err = ResourceQueryParameters::from_pairs([("pageSize", "ten")]).unwrap_err();
        assert_eq!(
            err,
            ParameterError::InvalidNumber {
                name: "pageSize",
                value: "ten".into()
            }
        );
        assert!(ResourceQueryParameters::from_pairs([("pageNumber", "")]).is_err());
    }

    #[test]
    fn query_string_omits_absent_values_and_encodes() {
        let mut p = ResourceQueryParameters::from_pairs([("searchQuery", "Stephen King")]).unwrap();
        p.set_page_size(5);

        assert_eq!(
            p.for_page(3).to_query_string(),
            "orderBy=Name&searchQuery=Stephen%20King&pageNumber=3&pageSize=5"
        );
    }

    #[test]
    fn filter_comes_from_genre_and_search() {
        let p = ResourceQueryParameters::from_pairs([("genre", " Horror ")]).unwrap();
        assert_eq!(p.author_filter().genre(), Some("horror"));
        assert_eq!(p.author_filter().search_query(), None);
    }
}
