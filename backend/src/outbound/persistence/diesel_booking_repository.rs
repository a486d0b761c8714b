//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! A booking spans the `bookings` row and its `booking_items`; saving
//! replaces the item rows inside one transaction so a reader never sees a
//! half-written item list.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::{SearchParams, SearchResult, SortDirection};
use uuid::Uuid;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingItem, BookingItemId, BookingPeriod, BookingRecord,
    Money,
};

use super::diesel_helpers::{
    RepositoryErrorKind as _, contains_pattern, count_to_total, from_json, order_by_column,
    page_window, parse_column, to_json,
};
use super::models::{BookingItemRow, BookingRow};
use super::pool::DbPool;
use super::schema::{booking_items, bookings};

/// Diesel-backed implementation of the `BookingRepository` port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type Error = BookingRepositoryError;

fn booking_to_row(booking: &Booking) -> BookingRow {
    let expected = booking.expected_period();
    let actual = booking.actual_period();
    BookingRow {
        id: *booking.id().as_uuid(),
        customer_name: booking.customer_name().to_owned(),
        event_date: booking.event_date(),
        expected_pick_up_date: expected.pick_up_date(),
        expected_return_date: expected.return_date(),
        actual_pick_up_date: actual.map(|period| period.pick_up_date()),
        actual_return_date: actual.and_then(|period| period.return_date()),
        amount_paid_cents: booking.amount_paid().cents(),
        status: booking.status().as_str().to_owned(),
        created_at: booking.created_at(),
    }
}

fn items_to_rows(booking: &Booking) -> Result<Vec<BookingItemRow>, Error> {
    booking
        .items()
        .iter()
        .enumerate()
        .map(|(position, item)| {
            Ok(BookingItemRow {
                id: *item.id().as_uuid(),
                booking_id: *booking.id().as_uuid(),
                position: i32::try_from(position)
                    .map_err(|_| Error::query("too many booking items"))?,
                product_id: item.product_id(),
                kind: item.kind().as_str().to_owned(),
                product_name: item.product_name().to_owned(),
                rent_price_cents: item.rent_price().cents(),
                image_path: item.image_path().to_owned(),
                adjustments: to_json(&item.adjustments(), "adjustments")
                    .map_err(Error::query)?,
            })
        })
        .collect()
}

fn row_to_item(row: BookingItemRow) -> Result<BookingItem, Error> {
    Ok(BookingItem::restore(
        BookingItemId::from_uuid(row.id),
        row.product_id,
        parse_column(&row.kind, "kind").map_err(Error::query)?,
        row.product_name,
        Money::from_cents(row.rent_price_cents),
        row.image_path,
        from_json(row.adjustments, "adjustments").map_err(Error::query)?,
    ))
}

fn row_to_booking(row: BookingRow, item_rows: Vec<BookingItemRow>) -> Result<Booking, Error> {
    let items = item_rows
        .into_iter()
        .map(row_to_item)
        .collect::<Result<Vec<_>, _>>()?;
    let actual_period = row
        .actual_pick_up_date
        .map(|pick_up| BookingPeriod::restore(pick_up, row.actual_return_date));
    Ok(Booking::restore(BookingRecord {
        id: BookingId::from_uuid(row.id),
        customer_name: row.customer_name,
        event_date: row.event_date,
        expected_period: BookingPeriod::restore(
            row.expected_pick_up_date,
            row.expected_return_date,
        ),
        actual_period,
        items,
        amount_paid: Money::from_cents(row.amount_paid_cents),
        status: parse_column(&row.status, "status").map_err(Error::query)?,
        created_at: row.created_at,
    }))
}

fn filtered(filter: Option<&BookingFilter>) -> bookings::BoxedQuery<'static, Pg> {
    let mut query = bookings::table.into_boxed();
    let Some(filter) = filter else {
        return query;
    };
    if let Some(name) = filter.customer_name.as_deref() {
        query = query.filter(bookings::customer_name.ilike(contains_pattern(name)));
    }
    if let Some(status) = filter.status {
        query = query.filter(bookings::status.eq(status.as_str()));
    }
    if let Some(event_date) = filter.event_date {
        query = query.filter(bookings::event_date.eq(event_date));
    }
    query
}

fn ordered(
    query: bookings::BoxedQuery<'static, Pg>,
    params: &SearchParams<BookingFilter>,
) -> bookings::BoxedQuery<'static, Pg> {
    let descending = params.sort_dir() == Some(SortDirection::Desc);
    let query = match params.sort() {
        Some("customer_name") => order_by_column!(query, bookings::customer_name, descending),
        Some("event_date") => order_by_column!(query, bookings::event_date, descending),
        Some("pick_up_date") => {
            order_by_column!(query, bookings::expected_pick_up_date, descending)
        }
        Some("created_at") => order_by_column!(query, bookings::created_at, descending),
        _ => query.order_by(bookings::created_at.desc()),
    };
    query.then_order_by(bookings::id.asc())
}

/// Load the items of `booking_ids`, grouped by booking and in position
/// order.
async fn load_items(
    conn: &mut AsyncPgConnection,
    booking_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<BookingItemRow>>, Error> {
    let rows: Vec<BookingItemRow> = booking_items::table
        .filter(booking_items::booking_id.eq_any(booking_ids))
        .order((booking_items::booking_id, booking_items::position))
        .select(BookingItemRow::as_select())
        .load(conn)
        .await
        .map_err(Error::from_diesel)?;
    let mut grouped: HashMap<Uuid, Vec<BookingItemRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.booking_id).or_default().push(row);
    }
    Ok(grouped)
}

fn assemble(
    rows: Vec<BookingRow>,
    mut items: HashMap<Uuid, Vec<BookingItemRow>>,
) -> Result<Vec<Booking>, Error> {
    rows.into_iter()
        .map(|row| {
            let item_rows = items.remove(&row.id).unwrap_or_default();
            row_to_booking(row, item_rows)
        })
        .collect()
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), Error> {
        let row = booking_to_row(booking);
        let item_rows = items_to_rows(booking)?;
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(bookings::table)
                    .values(&row)
                    .on_conflict(bookings::id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .await?;
                diesel::delete(booking_items::table.filter(booking_items::booking_id.eq(row.id)))
                    .execute(conn)
                    .await?;
                if !item_rows.is_empty() {
                    diesel::insert_into(booking_items::table)
                        .values(&item_rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(Error::from_diesel)
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, Error> {
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
        let row: Option<BookingRow> = bookings::table
            .filter(bookings::id.eq(id.as_uuid()))
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Error::from_diesel)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let items = load_items(&mut conn, &[row.id]).await?;
        assemble(vec![row], items).map(|mut found| found.pop())
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, Error> {
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
        let removed = diesel::delete(bookings::table.filter(bookings::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(Error::from_diesel)?;
        Ok(removed > 0)
    }

    async fn search(
        &self,
        params: &SearchParams<BookingFilter>,
    ) -> Result<SearchResult<Booking>, Error> {
        let (offset, limit) = page_window(params).map_err(Error::query)?;
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;

        let total: i64 = filtered(params.filter())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(Error::from_diesel)?;
        let rows: Vec<BookingRow> = ordered(filtered(params.filter()), params)
            .select(BookingRow::as_select())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(Error::from_diesel)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let items = if ids.is_empty() {
            HashMap::new()
        } else {
            load_items(&mut conn, &ids).await?
        };
        Ok(SearchResult::new(
            assemble(rows, items)?,
            count_to_total(total),
            params.page(),
            params.per_page(),
        ))
    }
}
