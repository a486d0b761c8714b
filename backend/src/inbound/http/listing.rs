//! Query parsing and response envelope shared by the list endpoints.
//!
//! Every list endpoint accepts `page`, `limit`, `sort` and `sortDir` next to
//! its own filters and answers with `{data, meta, links}`. The filters live
//! in a second query extractor; unknown keys are ignored by both.

use actix_web::HttpRequest;
use pagination::{PageLinks, PageMeta, RawSearchParams, SearchFilter, SearchParams, SearchResult};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::inbound::http::validation::{FieldName, parse_optional_integer};

/// Paging and ordering options of a list request.
///
/// Numbers arrive as text so a malformed value yields a field error rather
/// than a generic deserialisation failure.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number; defaults to 1.
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<String>,
    /// Page size; defaults to the configured page size.
    #[param(value_type = Option<i64>, example = 15)]
    pub limit: Option<String>,
    /// Field to sort by, e.g. `createdAt`; unknown fields are ignored.
    pub sort: Option<String>,
    /// `asc` or `desc`; defaults to `asc` when `sort` is set.
    #[param(example = "asc")]
    pub sort_dir: Option<String>,
}

impl PageQuery {
    /// Validate the numbers and combine them with `filter`.
    pub fn into_params<F: SearchFilter>(
        self,
        filter: F,
        default_per_page: u32,
    ) -> Result<SearchParams<F>, Error> {
        let raw = RawSearchParams {
            page: parse_optional_integer(self.page, FieldName::new("page"))?,
            per_page: parse_optional_integer(self.limit, FieldName::new("limit"))?,
            sort: self.sort.map(|field| snake_case(&field)),
            sort_dir: self.sort_dir,
            filter: Some(filter),
        };
        Ok(SearchParams::create_with_per_page(raw, default_per_page))
    }
}

/// Convert `rentPrice` to `rent_price`; snake case input passes through.
fn snake_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for ch in field.trim().chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// One page of a list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// `{total, currentPage, perPage, lastPage}`.
    #[schema(value_type = Object)]
    pub meta: PageMeta,
    /// `{self, first, prev?, next?, last?}` as absolute URLs.
    #[schema(value_type = Object)]
    pub links: PageLinks,
}

impl<T> Paginated<T> {
    /// Render `result` for the request it answers.
    pub fn from_result<U>(
        req: &HttpRequest,
        result: SearchResult<U>,
        render: impl FnMut(U) -> T,
    ) -> Result<Self, Error> {
        let url = request_url(req)?;
        let meta = result.meta();
        let links = PageLinks::build(&url, &meta);
        Ok(Self {
            data: result.into_items().into_iter().map(render).collect(),
            meta,
            links,
        })
    }
}

fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let info = req.connection_info();
    let path = req.uri().path_and_query().map_or("/", |pq| pq.as_str());
    let raw = format!("{}://{}{}", info.scheme(), info.host(), path);
    Url::parse(&raw).map_err(|err| Error::internal(format!("invalid request URL {raw}: {err}")))
}
