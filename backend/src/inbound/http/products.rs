//! Handler bodies shared by the dress and clutch routes.
//!
//! Both families expose the same routes; only the descriptive fields and
//! filters differ. Each family implements [`ProductResource`] and its
//! handlers delegate here. Creation and image replacement take
//! `multipart/form-data` (see [`super::multipart`]); partial updates take
//! JSON.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{ProductCommand, ProductQuery, ProductView};
use crate::domain::{Error, Money, Product, ProductDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::{PageQuery, Paginated};
use crate::inbound::http::multipart::{ProductForm, read_product_form};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_amount, parse_amount_text, parse_date, parse_path_id, require_text,
};

pub(crate) const RENT_PRICE: FieldName = FieldName::new("rentPrice");

/// Query for `GET /{products}/{id}/availability`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Day to check, `YYYY-MM-DD`.
    #[param(example = "2026-05-10")]
    pub date: Option<String>,
}

/// Whether a product is free on a given day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[schema(format = "uuid")]
    pub product_id: Uuid,
    pub date: NaiveDate,
    pub available: bool,
}

/// HTTP face of one product family.
pub(crate) trait ProductResource: Product {
    /// Body rendered for one product.
    type Response: for<'a> From<&'a ProductView<Self>> + Serialize;

    /// Write port for this family.
    fn commands(state: &HttpState) -> &dyn ProductCommand<Self>;

    /// Read port for this family.
    fn queries(state: &HttpState) -> &dyn ProductQuery<Self>;

    /// Build the creation draft from the text fields of `form`.
    fn draft(form: &mut ProductForm) -> Result<Self::Draft, Error>;
}

fn render<P: ProductResource>(view: &ProductView<P>) -> web::Json<P::Response> {
    web::Json(P::Response::from(view))
}

pub(crate) async fn list_products<P: ProductResource>(
    state: &HttpState,
    req: &HttpRequest,
    page: PageQuery,
    filter: P::Filter,
) -> ApiResult<web::Json<Paginated<P::Response>>> {
    let params = page.into_params(filter, state.default_page_size)?;
    let result = P::queries(state).search(params).await?;
    Paginated::from_result(req, result, |view| P::Response::from(&view)).map(web::Json)
}

/// Upload the image, then create the product from the remaining fields.
pub(crate) async fn create_product<P: ProductResource>(
    state: &HttpState,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let mut form = read_product_form(payload).await?;
    let image = form.require_image()?;
    let draft = P::draft(&mut form)?;
    let view = P::commands(state).create(draft, image).await?;
    Ok(HttpResponse::Created().json(P::Response::from(&view)))
}

pub(crate) async fn get_product<P: ProductResource>(
    state: &HttpState,
    path: &str,
) -> ApiResult<web::Json<P::Response>> {
    let view = P::queries(state).get(parse_path_id(path)?).await?;
    Ok(render(&view))
}

pub(crate) async fn update_product<P, B>(
    state: &HttpState,
    path: &str,
    body: B,
) -> ApiResult<web::Json<P::Response>>
where
    P: ProductResource,
    B: TryInto<P::Changes, Error = Error>,
{
    let id = parse_path_id(path)?;
    let changes = body.try_into()?;
    let view = P::commands(state).update(id, changes).await?;
    Ok(render(&view))
}

pub(crate) async fn delete_product<P: ProductResource>(
    state: &HttpState,
    path: &str,
) -> ApiResult<HttpResponse> {
    P::commands(state).delete(parse_path_id(path)?).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub(crate) async fn replace_product_image<P: ProductResource>(
    state: &HttpState,
    path: &str,
    payload: Multipart,
) -> ApiResult<web::Json<P::Response>> {
    let id = parse_path_id(path)?;
    let image = read_product_form(payload).await?.require_image()?;
    let view = P::commands(state).replace_image(id, image).await?;
    Ok(render(&view))
}

pub(crate) async fn pick_up_product<P: ProductResource>(
    state: &HttpState,
    path: &str,
) -> ApiResult<web::Json<P::Response>> {
    let view = P::commands(state).pick_up(parse_path_id(path)?).await?;
    Ok(render(&view))
}

pub(crate) async fn drop_off_product<P: ProductResource>(
    state: &HttpState,
    path: &str,
) -> ApiResult<web::Json<P::Response>> {
    let view = P::commands(state).drop_off(parse_path_id(path)?).await?;
    Ok(render(&view))
}

/// Answer an availability request for any product family.
pub(crate) async fn product_availability<P: ProductResource>(
    state: &HttpState,
    path: &str,
    date: Option<String>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let id: P::Id = parse_path_id(path)?;
    let field = FieldName::new("date");
    let date = parse_date(&require_text(date, field)?, field)?;
    let available = P::queries(state).check_availability(id, date).await?;
    Ok(web::Json(AvailabilityResponse {
        product_id: id.into(),
        date,
        available,
    }))
}

/// Shared descriptive fields of a creation form.
///
/// Blank colour or model reach the aggregate, which reports them as
/// validation errors.
pub(crate) fn product_draft(form: &mut ProductForm) -> Result<ProductDraft, Error> {
    let rent_price = require_text(form.take("rentPrice"), RENT_PRICE)?;
    Ok(ProductDraft {
        rent_price: parse_amount_text(&rent_price, RENT_PRICE)?,
        color: form.take("color").unwrap_or_default(),
        model: form.take("model").unwrap_or_default(),
    })
}

/// Optional price of a JSON update body.
pub(crate) fn optional_rent_price(value: Option<f64>) -> Result<Option<Money>, Error> {
    value
        .map(|amount| parse_amount(amount, RENT_PRICE))
        .transpose()
}

/// Reject an update body that changes nothing.
pub(crate) fn ensure_changes(has_changes: bool) -> Result<(), Error> {
    if has_changes {
        Ok(())
    } else {
        Err(Error::invalid_request("at least one field must be provided"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(Some(199.9), Some(19_990))]
    #[case(None, None)]
    fn rent_price_is_optional(#[case] raw: Option<f64>, #[case] cents: Option<i64>) {
        let price = optional_rent_price(raw).expect("finite amount");
        assert_eq!(price.map(Money::cents), cents);
    }

    #[rstest]
    fn non_finite_rent_price_is_rejected() {
        let err = optional_rent_price(Some(f64::NAN)).expect_err("NaN is not an amount");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn empty_update_is_rejected() {
        assert!(ensure_changes(true).is_ok());
        assert_eq!(
            ensure_changes(false).map_err(|err| err.code()),
            Err(ErrorCode::InvalidRequest)
        );
    }
}
