//! Offset pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: u64 = 10;

/// Upper bound on `limit`.
pub const MAX_LIMIT: u64 = 100;

/// Largest offset the database accepts.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Raw `?page=&limit=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Normalize into a [`Pagination`].
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// A normalized, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Pages below 1 become 1; a missing or non-positive limit becomes [`DEFAULT_LIMIT`];
    /// limits above [`MAX_LIMIT`] are capped. The page is capped so its offset fits
    /// in a signed 64-bit integer.
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let limit = limit
            .filter(|l| *l >= 1)
            .map_or(DEFAULT_LIMIT, |l| (l as u64).min(MAX_LIMIT));
        let page = page
            .filter(|p| *p >= 1)
            .map_or(1, |p| (p as u64).min(MAX_OFFSET / limit + 1));
        Self { page, limit }
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Build the metadata block for a result set of `total_items` rows.
    #[must_use]
    pub const fn metadata(&self, total_items: u64) -> PaginationMetadata {
        PaginationMetadata::new(self.page, self.limit, total_items)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Metadata block of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub current_page: u64,
    pub items_per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationMetadata {
    /// `total_pages` is `ceil(total_items / limit)`.
    #[must_use]
    pub const fn new(page: u64, limit: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(limit);
        Self {
            current_page: page,
            items_per_page: limit,
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

/// `{data, metadata}` list envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub metadata: PaginationMetadata,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(data: Vec<T>, pagination: Pagination, total_items: u64) -> Self {
        Self {
            data,
            metadata: pagination.metadata(total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_bad_input() {
        assert_eq!(
            Pagination::new(Some(0), Some(-5)),
            Pagination { page: 1, limit: DEFAULT_LIMIT }
        );
        assert_eq!(Pagination::new(None, Some(1000)).limit, MAX_LIMIT);
        assert_eq!(Pagination::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_huge_page_offset_fits_i64() {
        for limit in [1, 7, DEFAULT_LIMIT as i64, 100] {
            let pagination = Pagination::new(Some(i64::MAX), Some(limit));
            assert!(pagination.offset() <= i64::MAX as u64, "limit={limit}");
            assert!(pagination.page > 1);
        }

        let pagination = Pagination::new(Some(i64::MAX), Some(100));
        assert_eq!(pagination.page, i64::MAX as u64 / 100 + 1);
        let meta = pagination.metadata(0);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, limit, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (95, 7, 14)]
        {
            let meta = PaginationMetadata::new(1, limit, total);
            assert_eq!(meta.total_pages, expected, "total={total} limit={limit}");
        }
    }

    #[test]
    fn test_next_and_previous_flags() {
        let first = PaginationMetadata::new(1, 10, 25);
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);

        let last = PaginationMetadata::new(3, 10, 25);
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let json = serde_json::to_value(PaginationMetadata::new(2, 10, 15)).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["itemsPerPage"], 10);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["hasPreviousPage"], true);
    }
}
