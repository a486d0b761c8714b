//! Filter, sort and slice a collection held in memory.

use std::cmp::Ordering;

use crate::{SearchParams, SearchResult, SortDirection};

/// Search behaviour for an item stored in memory.
pub trait InMemorySearch<F> {
    /// True when the item satisfies every criterion in `filter`.
    fn matches(&self, filter: &F) -> bool;

    /// Compare two items by a whitelisted sort field.
    fn compare_by(&self, other: &Self, field: &str) -> Ordering;

    /// Order used when the caller does not request a sort.
    fn default_order(&self, other: &Self) -> Ordering;
}

/// Apply the filter, sort and page window of `params` to `items`.
///
/// `total` counts every item that passed the filter, not just the page.
#[must_use]
pub fn paginate_in_memory<T, F, I>(items: I, params: &SearchParams<F>) -> SearchResult<T>
where
    T: InMemorySearch<F>,
    I: IntoIterator<Item = T>,
{
    let mut matching: Vec<T> = items
        .into_iter()
        .filter(|item| params.filter().is_none_or(|filter| item.matches(filter)))
        .collect();

    match (params.sort(), params.sort_dir()) {
        (Some(field), dir) => matching.sort_by(|a, b| {
            let ordering = a.compare_by(b, field);
            if dir == Some(SortDirection::Desc) {
                ordering.reverse()
            } else {
                ordering
            }
        }),
        (None, _) => matching.sort_by(T::default_order),
    }

    let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(params.limit()).unwrap_or(usize::MAX);
    let page = matching.into_iter().skip(offset).take(limit).collect();

    SearchResult::new(page, total, params.page(), params.per_page())
}
