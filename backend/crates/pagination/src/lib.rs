//! Offset pagination primitives shared by Atelier repositories and endpoints.
//!
//! Repositories accept a [`SearchParams`] describing the requested page, sort
//! and filter, and answer with a [`SearchResult`]. Inbound adapters turn the
//! result into a response envelope with [`PageMeta`] and [`PageLinks`].
//!
//! # Examples
//!
//! ```
//! use pagination::{RawSearchParams, SearchFilter, SearchParams, SearchResult};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct NameFilter {
//!     name: Option<String>,
//! }
//!
//! impl SearchFilter for NameFilter {
//!     const SORTABLE_FIELDS: &'static [&'static str] = &["name"];
//!
//!     fn is_empty(&self) -> bool {
//!         self.name.is_none()
//!     }
//! }
//!
//! let params = SearchParams::create(RawSearchParams::<NameFilter> {
//!     page: Some(2),
//!     per_page: Some(10),
//!     ..RawSearchParams::default()
//! });
//! assert_eq!(params.offset(), 10);
//!
//! let result = SearchResult::new(vec!["a", "b"], 12, params.page(), params.per_page());
//! assert_eq!(result.last_page(), 2);
//! assert!(result.is_last_page());
//! ```

mod links;
mod memory;
mod params;
mod result;

pub use links::PageLinks;
pub use memory::{InMemorySearch, paginate_in_memory};
pub use params::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, ParseSortDirectionError, RawSearchParams, SearchFilter,
    SearchParams, SortDirection, normalize_text,
};
pub use result::{PageMeta, SearchResult};
