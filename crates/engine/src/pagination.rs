//! Pagination Engine: page/limit coercion, slicing and page metadata.

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// A validated, 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Zero falls back to the default; `limit` is capped at [`MAX_LIMIT`].
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = match limit {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_LIMIT),
        };
        Self { page, limit }
    }

    /// Coerce raw query parameters. Anything that is not a positive integer
    /// falls back to the default.
    #[must_use]
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0);
        Self::new(parse(page), parse(limit))
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `true` when this page starts at or after the last of `total_items`.
    /// Such a page is empty and must not reach the store, whose offsets are
    /// signed.
    pub fn is_past_end(&self, total_items: u64) -> bool {
        self.offset() >= total_items
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

impl PageMeta {
    #[must_use]
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            current_page: request.page,
            total_pages: total_items.div_ceil(request.limit),
            total_items,
            items_per_page: request.limit,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// No items, with metadata for `total_items`.
    pub fn empty(request: PageRequest, total_items: u64) -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::new(request, total_items),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Slice an already filtered and sorted sequence. A page past the end yields
/// no items but correct metadata.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_items = items.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
    let items = items.into_iter().skip(offset).take(limit).collect();
    Page {
        items,
        meta: PageMeta::new(request, total_items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_bad_parameters() {
        assert_eq!(PageRequest::parse(None, None), PageRequest::new(1, 10));
        assert_eq!(PageRequest::parse(Some("0"), Some("-5")), PageRequest::new(1, 10));
        assert_eq!(PageRequest::parse(Some("abc"), Some("2.5")), PageRequest::new(1, 10));
        assert_eq!(PageRequest::parse(Some(" 3 "), Some("25")), PageRequest::new(3, 25));
        assert_eq!(PageRequest::parse(Some("1"), Some("1000")).limit(), MAX_LIMIT);
    }

    #[test]
    fn metadata_and_slice_lengths_hold_for_all_pages() {
        for total in 0..=23usize {
            for limit in 1..=7u64 {
                for page in 1..=6u64 {
                    let request = PageRequest::new(page, limit);
                    let result = paginate((0..total).collect::<Vec<_>>(), request);
                    let total = total as u64;
                    assert_eq!(result.meta.total_pages, total.div_ceil(limit));
                    let expected = total.saturating_sub((page - 1) * limit).min(limit);
                    assert_eq!(result.items.len() as u64, expected);
                    if let Some(first) = result.items.first() {
                        assert_eq!(*first as u64, (page - 1) * limit);
                    }
                }
            }
        }
    }

    #[test]
    fn huge_page_is_past_the_end() {
        let request = PageRequest::parse(Some("18446744073709551615"), Some("10"));
        assert_eq!(request.page(), u64::MAX);
        assert_eq!(request.offset(), u64::MAX);
        assert!(request.is_past_end(25));
        assert!(PageRequest::new(1, 10).is_past_end(0));
        assert!(!PageRequest::new(3, 10).is_past_end(21));
        assert!(PageRequest::new(3, 10).is_past_end(20));
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let result = paginate(vec![1, 2, 3], PageRequest::new(9, 2));
        assert!(result.items.is_empty());
        assert_eq!(
            result.meta,
            PageMeta {
                current_page: 9,
                total_pages: 2,
                total_items: 3,
                items_per_page: 2,
            }
        );
    }
}
