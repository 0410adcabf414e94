//! Pagination defaults and clamp helpers for listing endpoints.

/// Default number of items per listing page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of items per listing page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page number to `>= 1`.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size into `[1, max]`, falling back to `default`.
pub fn clamp_page_size(size: Option<i64>, default: i64, max: i64) -> i64 {
    size.unwrap_or(default).clamp(1, max)
}

/// Offset for a 1-based page at the given page size.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(7)), 7);
    }

    #[test]
    fn page_size_clamps_to_bounds() {
        assert_eq!(clamp_page_size(None, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 10);
        assert_eq!(clamp_page_size(Some(0), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 1);
        assert_eq!(
            clamp_page_size(Some(500), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            100
        );
        assert_eq!(
            clamp_page_size(Some(25), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            25
        );
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }
}
