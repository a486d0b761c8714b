//! Navigation links for paginated HTTP responses.

use serde::Serialize;
use url::Url;

use crate::PageMeta;

/// Absolute links to neighbouring pages.
///
/// Existing query parameters other than `page` and `limit` are preserved so
/// filters and sort options survive navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// The page being returned.
    #[serde(rename = "self")]
    pub self_: String,
    /// Page one.
    pub first: String,
    /// Previous page, absent on page one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Next page, absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Last page, absent when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl PageLinks {
    /// Build links for `meta` relative to the request URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageLinks, SearchResult};
    /// use url::Url;
    ///
    /// let url = Url::parse("http://localhost/api/v1/dresses?color=azul&page=2").unwrap();
    /// let meta = SearchResult::new(vec![()], 40, 2, 15).meta();
    /// let links = PageLinks::build(&url, &meta);
    /// assert_eq!(
    ///     links.next.as_deref(),
    ///     Some("http://localhost/api/v1/dresses?color=azul&page=3&limit=15")
    /// );
    /// ```
    #[must_use]
    pub fn build(request_url: &Url, meta: &PageMeta) -> Self {
        let page = u64::from(meta.current_page);
        let last = meta.last_page;
        Self {
            self_: page_url(request_url, page, meta.per_page),
            first: page_url(request_url, 1, meta.per_page),
            prev: (page > 1).then(|| page_url(request_url, page - 1, meta.per_page)),
            next: (page < last).then(|| page_url(request_url, page + 1, meta.per_page)),
            last: (last > 0).then(|| page_url(request_url, last, meta.per_page)),
        }
    }
}

fn page_url(base: &Url, page: u64, per_page: u32) -> String {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page" && key != "limit")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs
            .append_pair("page", &page.to_string())
            .append_pair("limit", &per_page.to_string());
    }
    url.into()
}
