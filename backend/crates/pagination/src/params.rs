//! Search request parameters and their normalisation rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page returned when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when neither the caller nor the endpoint chooses one.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Direction applied to the sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest value first.
    #[default]
    Asc,
    /// Largest value first.
    Desc,
}

impl SortDirection {
    /// Lowercase wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort direction is neither `asc` nor `desc`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sort direction must be asc or desc (got {value})")]
pub struct ParseSortDirectionError {
    /// Rejected input.
    pub value: String,
}

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseSortDirectionError {
                value: s.to_owned(),
            }),
        }
    }
}

/// Typed filter accepted by a searchable repository.
///
/// Implementors describe which fields may be sorted on and when the filter
/// carries no criteria at all.
pub trait SearchFilter: Sized {
    /// Fields a caller may sort by; anything else is ignored.
    const SORTABLE_FIELDS: &'static [&'static str];

    /// True when no criterion is set.
    fn is_empty(&self) -> bool;

    /// Collapse an empty filter to `None`.
    fn normalized(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// Trim a free-text criterion, returning `None` when it is blank.
///
/// # Examples
///
/// ```
/// use pagination::normalize_text;
///
/// assert_eq!(normalize_text(Some("  Ana ".to_owned())), Some("Ana".to_owned()));
/// assert_eq!(normalize_text(Some("   ".to_owned())), None);
/// assert_eq!(normalize_text(None), None);
/// ```
#[must_use]
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

/// Unvalidated search input as it arrives from an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSearchParams<F> {
    /// Requested page, one-based.
    pub page: Option<i64>,
    /// Requested page size.
    pub per_page: Option<i64>,
    /// Requested sort field.
    pub sort: Option<String>,
    /// Requested sort direction.
    pub sort_dir: Option<String>,
    /// Requested filter.
    pub filter: Option<F>,
}

impl<F> Default for RawSearchParams<F> {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

/// Normalised search request handed to repositories.
///
/// ## Invariants
/// - `page >= 1` and `per_page >= 1`.
/// - `sort` is one of `F::SORTABLE_FIELDS` when present.
/// - `sort_dir` is present exactly when `sort` is.
/// - `filter` is never an empty filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams<F> {
    page: u32,
    per_page: u32,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<F>,
}

fn positive_or(value: Option<i64>, default: u32) -> u32 {
    value
        .and_then(|raw| u32::try_from(raw).ok())
        .filter(|parsed| *parsed > 0)
        .unwrap_or(default)
}

impl<F: SearchFilter> SearchParams<F> {
    /// Normalise raw input using [`DEFAULT_PER_PAGE`].
    #[must_use]
    pub fn create(raw: RawSearchParams<F>) -> Self {
        Self::create_with_per_page(raw, DEFAULT_PER_PAGE)
    }

    /// Normalise raw input with an endpoint-specific default page size.
    ///
    /// A zero `default_per_page` falls back to [`DEFAULT_PER_PAGE`].
    #[must_use]
    pub fn create_with_per_page(raw: RawSearchParams<F>, default_per_page: u32) -> Self {
        let default_per_page = if default_per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            default_per_page
        };
        let sort = normalize_text(raw.sort)
            .filter(|field| F::SORTABLE_FIELDS.contains(&field.as_str()));
        let sort_dir = sort.as_ref().map(|_| {
            raw.sort_dir
                .as_deref()
                .and_then(|dir| dir.parse().ok())
                .unwrap_or_default()
        });

        Self {
            page: positive_or(raw.page, DEFAULT_PAGE),
            per_page: positive_or(raw.per_page, default_per_page),
            sort,
            sort_dir,
            filter: raw.filter.and_then(SearchFilter::normalized),
        }
    }
}

impl<F> SearchParams<F> {
    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Sort field, when one was requested and allowed.
    #[must_use]
    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Sort direction paired with [`Self::sort`].
    #[must_use]
    pub const fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    /// Filter criteria, `None` when nothing is filtered.
    #[must_use]
    pub const fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Number of items skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for parameter normalisation.

    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct ColorFilter {
        color: Option<String>,
    }

    impl SearchFilter for ColorFilter {
        const SORTABLE_FIELDS: &'static [&'static str] = &["color", "created_at"];

        fn is_empty(&self) -> bool {
            self.color.is_none()
        }
    }

    fn raw(page: Option<i64>, per_page: Option<i64>) -> RawSearchParams<ColorFilter> {
        RawSearchParams {
            page,
            per_page,
            ..RawSearchParams::default()
        }
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(0), 1)]
    #[case(Some(-3), 1)]
    #[case(Some(4), 4)]
    fn page_defaults_when_absent_or_not_positive(
        #[case] page: Option<i64>,
        #[case] expected: u32,
    ) {
        let params = SearchParams::create(raw(page, None));
        assert_eq!(params.page(), expected);
    }

    #[rstest]
    #[case(None, DEFAULT_PER_PAGE)]
    #[case(Some(0), DEFAULT_PER_PAGE)]
    #[case(Some(-1), DEFAULT_PER_PAGE)]
    #[case(Some(50), 50)]
    fn per_page_defaults_when_absent_or_not_positive(
        #[case] per_page: Option<i64>,
        #[case] expected: u32,
    ) {
        let params = SearchParams::create(raw(None, per_page));
        assert_eq!(params.per_page(), expected);
    }

    #[rstest]
    fn endpoint_default_page_size_is_used() {
        let params = SearchParams::create_with_per_page(raw(None, None), 25);
        assert_eq!(params.per_page(), 25);
    }

    #[rstest]
    fn unknown_sort_field_is_dropped() {
        let params = SearchParams::create(RawSearchParams::<ColorFilter> {
            sort: Some("password".to_owned()),
            sort_dir: Some("desc".to_owned()),
            ..RawSearchParams::default()
        });
        assert_eq!(params.sort(), None);
        assert_eq!(params.sort_dir(), None);
    }

    #[rstest]
    #[case(None, SortDirection::Asc)]
    #[case(Some("DESC"), SortDirection::Desc)]
    #[case(Some("sideways"), SortDirection::Asc)]
    fn sort_direction_defaults_to_ascending(
        #[case] dir: Option<&str>,
        #[case] expected: SortDirection,
    ) {
        let params = SearchParams::create(RawSearchParams::<ColorFilter> {
            sort: Some("color".to_owned()),
            sort_dir: dir.map(str::to_owned),
            ..RawSearchParams::default()
        });
        assert_eq!(params.sort(), Some("color"));
        assert_eq!(params.sort_dir(), Some(expected));
    }

    #[rstest]
    fn empty_filter_collapses_to_none() {
        let params = SearchParams::create(RawSearchParams {
            filter: Some(ColorFilter::default()),
            ..RawSearchParams::default()
        });
        assert!(params.filter().is_none());
    }

    #[rstest]
    fn offset_follows_page_and_size() {
        let params = SearchParams::create(raw(Some(3), Some(20)));
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);
    }

    #[rstest]
    fn sort_direction_rejects_unknown_values() {
        let err = "up".parse::<SortDirection>().expect_err("invalid direction");
        assert_eq!(err.value, "up");
    }
}
