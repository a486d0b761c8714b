//! A single page of search results.

use serde::Serialize;

/// One page of items plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<T> {
    items: Vec<T>,
    total: u64,
    current_page: u32,
    per_page: u32,
}

/// Pagination metadata rendered alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total matching items across all pages.
    pub total: u64,
    /// One-based page number of this page.
    pub current_page: u32,
    /// Page size used for this page.
    pub per_page: u32,
    /// Last page number; zero when nothing matched.
    pub last_page: u64,
}

impl<T> SearchResult<T> {
    /// Wrap a page of items.
    ///
    /// A zero `per_page` is treated as one so the page count stays finite.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, current_page: u32, per_page: u32) -> Self {
        Self {
            items,
            total,
            current_page: current_page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// An empty page.
    #[must_use]
    pub fn empty(current_page: u32, per_page: u32) -> Self {
        Self::new(Vec::new(), 0, current_page, per_page)
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total matching items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// One-based page number.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// `ceil(total / per_page)`, zero for an empty result.
    #[must_use]
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page))
    }

    /// True on page one.
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    /// True when no page follows this one.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        u64::from(self.current_page) == self.last_page()
    }

    /// Metadata for response envelopes.
    #[must_use]
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page(),
        }
    }

    /// Transform every item, keeping the page shape.
    pub fn map<U, M>(self, f: M) -> SearchResult<U>
    where
        M: FnMut(T) -> U,
    {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
        }
    }

    /// Transform every item with a fallible mapper, stopping at the first
    /// error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E, M>(self, f: M) -> Result<SearchResult<U>, E>
    where
        M: FnMut(T) -> Result<U, E>,
    {
        let items = self.items.into_iter().map(f).collect::<Result<_, _>>()?;
        Ok(SearchResult {
            items,
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 15, 0)]
    #[case(1, 15, 1)]
    #[case(15, 15, 1)]
    #[case(16, 15, 2)]
    #[case(45, 15, 3)]
    fn last_page_rounds_up(#[case] total: u64, #[case] per_page: u32, #[case] expected: u64) {
        let result: SearchResult<()> = SearchResult::new(Vec::new(), total, 1, per_page);
        assert_eq!(result.last_page(), expected);
    }

    #[rstest]
    fn middle_page_is_neither_first_nor_last() {
        let result = SearchResult::new(vec![1, 2], 6, 2, 2);
        assert!(!result.is_first_page());
        assert!(!result.is_last_page());
    }

    #[rstest]
    fn single_page_is_first_and_last() {
        let result = SearchResult::new(vec![1], 1, 1, 15);
        assert!(result.is_first_page());
        assert!(result.is_last_page());
    }

    #[rstest]
    fn empty_result_is_not_last_page() {
        let result: SearchResult<u8> = SearchResult::empty(1, 15);
        assert_eq!(result.last_page(), 0);
        assert!(!result.is_last_page());
    }

    #[rstest]
    fn map_keeps_page_shape() {
        let result = SearchResult::new(vec![1, 2, 3], 9, 3, 3).map(|n| n * 10);
        assert_eq!(result.items(), &[10, 20, 30]);
        assert_eq!(result.total(), 9);
        assert!(result.is_last_page());
    }

    #[rstest]
    fn try_map_propagates_first_error() {
        let outcome = SearchResult::new(vec![1, 2, 3], 3, 1, 3)
            .try_map(|n| if n == 2 { Err("two") } else { Ok(n) });
        assert_eq!(outcome, Err("two"));
    }

    #[rstest]
    fn meta_serialises_in_camel_case() {
        let meta = SearchResult::new(vec!['a'], 31, 2, 15).meta();
        let json = serde_json::to_value(meta).expect("serialise meta");
        assert_eq!(
            json,
            serde_json::json!({
                "total": 31,
                "currentPage": 2,
                "perPage": 15,
                "lastPage": 3,
            })
        );
    }
}
