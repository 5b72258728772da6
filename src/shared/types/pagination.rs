//! Paged results over a deferred, already filtered and sorted source.
//!
//! A page is produced in two passes over the same source: one to count
//! every matching item, one to fetch the `(page - 1) * size .. + size`
//! slice. Both passes must see the same filter and ordering, otherwise the
//! totals and the slice disagree.

use std::ops::Deref;

use async_trait::async_trait;
use thiserror::Error;

/// Rejected paging arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagingError {
    #[error("pageSize must be greater than zero, got {0}")]
    InvalidPageSize(i64),

    #[error("pageNumber must be greater than zero, got {0}")]
    InvalidPageNumber(i64),
}

/// A query that can be counted and sliced.
///
/// Implementations must apply identical filtering and ordering in
/// [`count`](PageSource::count) and [`fetch`](PageSource::fetch).
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Error: From<PagingError> + Send;

    async fn count(&self) -> Result<u64, Self::Error>;

    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<Self::Item>, Self::Error>;
}

#[async_trait]
impl<T: Clone + Send + Sync> PageSource for Vec<T> {
    type Item = T;
    type Error = PagingError;

    async fn count(&self) -> Result<u64, PagingError> {
        Ok(self.len() as u64)
    }

    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<T>, PagingError> {
        Ok(self
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// One page of items plus the metadata describing where it sits.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    items: Vec<T>,
    total_count: u64,
    page_size: u64,
    current_page: u64,
    total_pages: u64,
}

fn checked_paging(page_number: i64, page_size: i64) -> Result<(u64, u64), PagingError> {
    if page_size <= 0 {
        return Err(PagingError::InvalidPageSize(page_size));
    }
    if page_number <= 0 {
        return Err(PagingError::InvalidPageNumber(page_number));
    }
    Ok((page_number as u64, page_size as u64))
}

impl<T> PagedList<T> {
    /// Package an already materialized page.
    pub fn new(
        items: Vec<T>,
        count: u64,
        page_number: i64,
        page_size: i64,
    ) -> Result<Self, PagingError> {
        let (current_page, page_size) = checked_paging(page_number, page_size)?;
        Ok(Self::from_parts(items, count, current_page, page_size))
    }

    /// Count `source`, then fetch the requested page from it.
    ///
    /// Invalid paging arguments are rejected before the source is touched.
    pub async fn create<S>(source: &S, page_number: i64, page_size: i64) -> Result<Self, S::Error>
    where
        S: PageSource<Item = T>,
    {
        let (current_page, page_size) = checked_paging(page_number, page_size)?;

        let count = source.count().await?;
        let offset = (current_page - 1).saturating_mul(page_size);
        let items = source.fetch(offset, page_size).await?;

        Ok(Self::from_parts(items, count, current_page, page_size))
    }

    fn from_parts(items: Vec<T>, total_count: u64, current_page: u64, page_size: u64) -> Self {
        let total_pages = (total_count as f64 / page_size as f64).ceil() as u64;
        Self {
            items,
            total_count,
            page_size,
            current_page,
            total_pages,
        }
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert every item while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

impl<T> Deref for PagedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
