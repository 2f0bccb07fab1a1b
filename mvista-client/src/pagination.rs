//! Pagination for list views

/// Rows per page when none is requested
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    /// Offset for the `offset` query parameter
    pub offset: i64,
}

impl Pagination {
    /// 1-indexed first and last row shown on this page, `None` when empty
    pub fn display_range(&self, total_results: i64) -> Option<(i64, i64)> {
        if total_results <= 0 {
            return None;
        }
        let start = self.offset.saturating_add(1);
        let end = self.page.saturating_mul(self.page_size).min(total_results);
        Some((start, end))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// The page is clamped to `[1, total_pages]` and a page size below 1 falls
/// back to [`DEFAULT_PAGE_SIZE`].
///
/// # Examples
/// ```
/// use mvista_client::pagination::calculate_pagination;
///
/// // 30 results at 12 per page = 3 pages (12 + 12 + 6)
/// let p = calculate_pagination(30, 2, 12);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 12);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(30, 99, 12);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 24);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64, page_size: i64) -> Pagination {
    let page_size = if page_size < 1 { DEFAULT_PAGE_SIZE } else { page_size };
    let total_results = total_results.max(0);
    let total_pages = total_results / page_size + i64::from(total_results % page_size != 0);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1).saturating_mul(page_size);

    Pagination {
        page,
        page_size,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(30, 2, 12);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 12);
        assert_eq!(p.display_range(30), Some((13, 24)));
    }

    #[test]
    fn test_pagination_last_page_partial() {
        let p = calculate_pagination(30, 3, 12);
        assert_eq!(p.offset, 24);
        assert_eq!(p.display_range(30), Some((25, 30)));
        assert!(!p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn test_pagination_out_of_bounds() {
        let p = calculate_pagination(30, 99, 12);
        assert_eq!(p.page, 3);

        let p = calculate_pagination(30, 0, 12);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
        assert!(!p.has_prev());
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1, 12);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
        assert_eq!(p.display_range(0), None);
        assert!(!p.has_next());
    }

    #[test]
    fn test_pagination_invalid_page_size() {
        let p = calculate_pagination(30, 1, 0);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_pagination_huge_page_size_does_not_overflow() {
        let p = calculate_pagination(30, 5, i64::MAX);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.offset, 0);
        assert_eq!(p.display_range(30), Some((1, 30)));

        let p = calculate_pagination(i64::MAX, i64::MAX, i64::MAX - 1);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.offset, i64::MAX - 1);
        assert_eq!(p.display_range(i64::MAX), Some((i64::MAX, i64::MAX)));
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(24, 2, 12);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.display_range(24), Some((13, 24)));
    }
}
