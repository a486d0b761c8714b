//! PostgreSQL-backed `ProductRepository` implementations for dresses and
//! clutches.
//!
//! Both tables share their column layout apart from the dress fabric, so
//! the port implementation is generated once per table by
//! `impl_product_repository!` while the row conversion, filtering and
//! sorting stay explicit per kind.

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{SearchParams, SearchResult, SortDirection};
use uuid::Uuid;

use crate::domain::ports::ProductRepositoryError;
use crate::domain::{
    Clutch, ClutchFilter, Dress, DressFilter, Money, Period, Product, ProductCore, ProductRecord,
};

use super::diesel_helpers::{
    RepositoryErrorKind as _, contains_pattern, count_to_total, from_json, order_by_column,
    page_window, to_json,
};
use super::models::{ClutchRow, DressRow};
use super::pool::DbPool;
use super::schema::{clutches, dresses};

type Error = ProductRepositoryError;

/// Generate a Diesel `ProductRepository` implementation for one table.
macro_rules! impl_product_repository {
    (
        $(#[$meta:meta])*
        $repo:ident for $product:ty {
            table: $table:ident,
            row: $row:ty,
            to_row: $to_row:path,
            from_row: $from_row:path,
            filtered: $filtered:path,
            ordered: $ordered:path $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait::async_trait]
        impl $crate::domain::ports::ProductRepository<$product> for $repo {
            async fn save(&self, product: &$product) -> Result<(), Error> {
                let row = $to_row(product)?;
                let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
                diesel::insert_into($table::table)
                    .values(&row)
                    .on_conflict($table::id)
                    .do_update()
                    .set(&row)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(Error::from_diesel)
            }

            async fn find_by_id(
                &self,
                id: &<$product as Product>::Id,
            ) -> Result<Option<$product>, Error> {
                let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
                let row: Option<$row> = $table::table
                    .filter($table::id.eq(id.as_uuid()))
                    .select(<$row>::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(Error::from_diesel)?;
                row.map($from_row).transpose()
            }

            async fn find_by_ids(
                &self,
                ids: &[<$product as Product>::Id],
            ) -> Result<Vec<$product>, Error> {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
                let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
                let rows: Vec<$row> = $table::table
                    .filter($table::id.eq_any(&uuids))
                    .select(<$row>::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(Error::from_diesel)?;
                rows.into_iter().map($from_row).collect()
            }

            async fn delete(&self, id: &<$product as Product>::Id) -> Result<bool, Error> {
                let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
                let removed = diesel::delete($table::table.filter($table::id.eq(id.as_uuid())))
                    .execute(&mut conn)
                    .await
                    .map_err(Error::from_diesel)?;
                Ok(removed > 0)
            }

            async fn search(
                &self,
                params: &SearchParams<<$product as Product>::Filter>,
            ) -> Result<SearchResult<$product>, Error> {
                let (offset, limit) = page_window(params).map_err(Error::query)?;
                let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
                let total: i64 = $filtered(params.filter())
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(Error::from_diesel)?;
                let rows: Vec<$row> = $ordered($filtered(params.filter()), params)
                    .select(<$row>::as_select())
                    .offset(offset)
                    .limit(limit)
                    .load(&mut conn)
                    .await
                    .map_err(Error::from_diesel)?;
                let items = rows
                    .into_iter()
                    .map($from_row)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SearchResult::new(
                    items,
                    count_to_total(total),
                    params.page(),
                    params.per_page(),
                ))
            }
        }
    };
}

fn periods_to_json(core: &ProductCore) -> Result<serde_json::Value, Error> {
    to_json(&core.reservation_periods(), "reservation_periods").map_err(Error::query)
}

fn periods_from_json(value: serde_json::Value) -> Result<Vec<Period>, Error> {
    from_json(value, "reservation_periods").map_err(Error::query)
}

fn dress_to_row(dress: &Dress) -> Result<DressRow, Error> {
    let core = dress.core();
    Ok(DressRow {
        id: core.id(),
        image_path: core.image_path().to_owned(),
        rent_price_cents: core.rent_price().cents(),
        color: core.color().to_owned(),
        model: core.model().to_owned(),
        fabric: dress.fabric().to_owned(),
        is_picked_up: core.is_picked_up(),
        reservation_periods: periods_to_json(core)?,
        created_at: core.created_at(),
    })
}

fn row_to_dress(row: DressRow) -> Result<Dress, Error> {
    let record = ProductRecord {
        id: row.id,
        image_path: row.image_path,
        rent_price: Money::from_cents(row.rent_price_cents),
        color: row.color,
        model: row.model,
        is_picked_up: row.is_picked_up,
        reservation_periods: periods_from_json(row.reservation_periods)?,
        created_at: row.created_at,
    };
    Ok(Dress::restore(record, row.fabric))
}

fn clutch_to_row(clutch: &Clutch) -> Result<ClutchRow, Error> {
    let core = clutch.core();
    Ok(ClutchRow {
        id: core.id(),
        image_path: core.image_path().to_owned(),
        rent_price_cents: core.rent_price().cents(),
        color: core.color().to_owned(),
        model: core.model().to_owned(),
        is_picked_up: core.is_picked_up(),
        reservation_periods: periods_to_json(core)?,
        created_at: core.created_at(),
    })
}

fn row_to_clutch(row: ClutchRow) -> Result<Clutch, Error> {
    Ok(Clutch::restore(ProductRecord {
        id: row.id,
        image_path: row.image_path,
        rent_price: Money::from_cents(row.rent_price_cents),
        color: row.color,
        model: row.model,
        is_picked_up: row.is_picked_up,
        reservation_periods: periods_from_json(row.reservation_periods)?,
        created_at: row.created_at,
    }))
}

fn filtered_dresses(filter: Option<&DressFilter>) -> dresses::BoxedQuery<'static, Pg> {
    let mut query = dresses::table.into_boxed();
    let Some(filter) = filter else {
        return query;
    };
    if let Some(color) = filter.color.as_deref() {
        query = query.filter(dresses::color.ilike(contains_pattern(color)));
    }
    if let Some(model) = filter.model.as_deref() {
        query = query.filter(dresses::model.ilike(contains_pattern(model)));
    }
    if let Some(fabric) = filter.fabric.as_deref() {
        query = query.filter(dresses::fabric.ilike(contains_pattern(fabric)));
    }
    query
}

fn ordered_dresses(
    query: dresses::BoxedQuery<'static, Pg>,
    params: &SearchParams<DressFilter>,
) -> dresses::BoxedQuery<'static, Pg> {
    let descending = params.sort_dir() == Some(SortDirection::Desc);
    let query = match params.sort() {
        Some("color") => order_by_column!(query, dresses::color, descending),
        Some("model") => order_by_column!(query, dresses::model, descending),
        Some("fabric") => order_by_column!(query, dresses::fabric, descending),
        Some("rent_price") => order_by_column!(query, dresses::rent_price_cents, descending),
        Some("created_at") => order_by_column!(query, dresses::created_at, descending),
        _ => query.order_by(dresses::created_at.desc()),
    };
    query.then_order_by(dresses::id.asc())
}

fn filtered_clutches(filter: Option<&ClutchFilter>) -> clutches::BoxedQuery<'static, Pg> {
    let mut query = clutches::table.into_boxed();
    let Some(filter) = filter else {
        return query;
    };
    if let Some(color) = filter.color.as_deref() {
        query = query.filter(clutches::color.ilike(contains_pattern(color)));
    }
    if let Some(model) = filter.model.as_deref() {
        query = query.filter(clutches::model.ilike(contains_pattern(model)));
    }
    query
}

fn ordered_clutches(
    query: clutches::BoxedQuery<'static, Pg>,
    params: &SearchParams<ClutchFilter>,
) -> clutches::BoxedQuery<'static, Pg> {
    let descending = params.sort_dir() == Some(SortDirection::Desc);
    let query = match params.sort() {
        Some("color") => order_by_column!(query, clutches::color, descending),
        Some("model") => order_by_column!(query, clutches::model, descending),
        Some("rent_price") => order_by_column!(query, clutches::rent_price_cents, descending),
        Some("created_at") => order_by_column!(query, clutches::created_at, descending),
        _ => query.order_by(clutches::created_at.desc()),
    };
    query.then_order_by(clutches::id.asc())
}

impl_product_repository! {
    /// Diesel-backed dress repository.
    DieselDressRepository for Dress {
        table: dresses,
        row: DressRow,
        to_row: dress_to_row,
        from_row: row_to_dress,
        filtered: filtered_dresses,
        ordered: ordered_dresses,
    }
}

impl_product_repository! {
    /// Diesel-backed clutch repository.
    DieselClutchRepository for Clutch {
        table: clutches,
        row: ClutchRow,
        to_row: clutch_to_row,
        from_row: row_to_clutch,
        filtered: filtered_clutches,
        ordered: ordered_clutches,
    }
}
