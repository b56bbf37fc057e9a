//! Page-number pagination primitives shared by bookshelf list endpoints.
//!
//! A [`PageRequest`] captures a validated `(page, limit)` pair and derives the
//! store offset. A [`PageInfo`] summarises where a returned slice sits within
//! the full result set, and [`Page`] pairs that summary with the items.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! # fn main() -> Result<(), pagination::PaginationError> {
//! let request = PageRequest::new(2, 5)?;
//! assert_eq!(request.offset(), 5);
//!
//! let page = Page::new(vec!["f", "g"], request, 7);
//! assert_eq!(page.info().total_pages(), 2);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

/// Page size applied when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 5;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while validating pagination inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are one-based.
    #[error("page must be at least 1")]
    PageTooSmall,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    LimitTooSmall,
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// Maximum permitted page size.
        max: u32,
    },
}

/// Validated one-based page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns a [`PaginationError`] when `page` or `limit` fall outside the
    /// documented bounds.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::PageTooSmall);
        }
        if limit == 0 {
            return Err(PaginationError::LimitTooSmall);
        }
        if limit > MAX_LIMIT {
            return Err(PaginationError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from optional client inputs without rejecting any.
    ///
    /// A missing or zero `page` becomes 1, a missing or zero `limit` becomes
    /// `default_limit`, and a `limit` above [`MAX_LIMIT`] is clamped to it.
    #[must_use]
    pub const fn resolve(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        let resolved_page = match page {
            Some(value) if value > 0 => value,
            _ => 1,
        };
        let requested_limit = match limit {
            Some(value) if value > 0 => value,
            _ => default_limit,
        };
        let resolved_limit = if requested_limit == 0 {
            DEFAULT_LIMIT
        } else if requested_limit > MAX_LIMIT {
            MAX_LIMIT
        } else {
            requested_limit
        };
        Self {
            page: resolved_page,
            limit: resolved_limit,
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of matching items to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPageRequest {
    page: u32,
    limit: u32,
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
        }
    }
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PaginationError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.page, value.limit)
    }
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    current_page: u32,
    limit: u32,
    total_items: u64,
    total_pages: u64,
}

impl PageInfo {
    /// Summarise `request` against `total_items` matching records.
    ///
    /// `total_pages` is `ceil(total_items / limit)`, so an empty result set
    /// reports zero pages.
    #[must_use]
    pub const fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            current_page: request.page,
            limit: request.limit,
            total_items,
            total_pages: total_items.div_ceil(request.limit as u64),
        }
    }

    /// One-based page number that was requested.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Page size that was requested.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Total number of records matching the query.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Total number of pages at the requested size.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }
}

/// A slice of items plus its [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    #[serde(flatten)]
    info: PageInfo,
}

impl<T> Page<T> {
    /// Pair `items` with paging metadata derived from `request`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            info: PageInfo::new(request, total_items),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Paging metadata.
    #[must_use]
    pub const fn info(&self) -> PageInfo {
        self.info
    }

    /// Split the page into its items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageInfo) {
        (self.items, self.info)
    }

    /// Transform every item while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page arithmetic and validation.

    use super::*;
    use rstest::rstest;

    fn request(page: u32, limit: u32) -> PageRequest {
        match PageRequest::new(page, limit) {
            Ok(value) => value,
            Err(error) => panic!("fixture request should be valid: {error}"),
        }
    }

    #[rstest]
    #[case(0, 5, PaginationError::PageTooSmall)]
    #[case(1, 0, PaginationError::LimitTooSmall)]
    #[case(1, MAX_LIMIT + 1, PaginationError::LimitTooLarge { max: MAX_LIMIT })]
    fn rejects_out_of_bounds_requests(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PaginationError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    #[case(1, 5, 0)]
    #[case(2, 5, 5)]
    #[case(3, 10, 20)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        assert_eq!(request(page, limit).offset(), offset);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(5, 1)]
    #[case(6, 2)]
    #[case(11, 3)]
    fn total_pages_rounds_up(#[case] total_items: u64, #[case] total_pages: u64) {
        let info = PageInfo::new(request(1, 5), total_items);
        assert_eq!(info.total_pages(), total_pages);
    }

    #[rstest]
    fn missing_inputs_fall_back_to_defaults() {
        let resolved = PageRequest::resolve(None, None, DEFAULT_LIMIT);
        assert_eq!(resolved, PageRequest::default());
    }

    #[rstest]
    #[case(Some(0), Some(0), 1, DEFAULT_LIMIT)]
    #[case(Some(3), Some(MAX_LIMIT + 1), 3, MAX_LIMIT)]
    #[case(Some(2), Some(u32::MAX), 2, MAX_LIMIT)]
    #[case(None, Some(7), 1, 7)]
    fn client_inputs_are_normalised_not_rejected(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let resolved = PageRequest::resolve(page, limit, DEFAULT_LIMIT);
        assert_eq!(resolved, request(expected_page, expected_limit));
    }

    #[rstest]
    fn out_of_range_default_limit_is_repaired() {
        assert_eq!(PageRequest::resolve(None, None, 0).limit(), DEFAULT_LIMIT);
        assert_eq!(PageRequest::resolve(None, None, 500).limit(), MAX_LIMIT);
    }

    #[rstest]
    fn page_serialises_flat_camel_case_metadata() {
        let page = Page::new(vec![1_u8, 2], request(2, 2), 5);
        let value = match serde_json::to_value(&page) {
            Ok(value) => value,
            Err(error) => panic!("page should serialise: {error}"),
        };
        assert_eq!(
            value,
            serde_json::json!({
                "items": [1, 2],
                "currentPage": 2,
                "limit": 2,
                "totalItems": 5,
                "totalPages": 3,
            })
        );
    }

    #[rstest]
    fn map_preserves_metadata() {
        let page = Page::new(vec![1_u8, 2], request(1, 5), 2).map(u32::from);
        assert_eq!(page.items(), &[1_u32, 2]);
        assert_eq!(page.info().total_items(), 2);
    }
}
