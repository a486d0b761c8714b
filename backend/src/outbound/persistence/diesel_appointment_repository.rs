//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! The status history is stored as a JSONB array next to the appointment
//! row, so one upsert persists the whole aggregate.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{SearchParams, SearchResult, SortDirection};

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{Appointment, AppointmentFilter, AppointmentId, AppointmentRecord, BookingId};

use super::diesel_helpers::{
    RepositoryErrorKind as _, contains_pattern, count_to_total, from_json, order_by_column,
    page_window, parse_column, to_json,
};
use super::models::AppointmentRow;
use super::pool::DbPool;
use super::schema::appointments;

/// Diesel-backed implementation of the `AppointmentRepository` port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type Error = AppointmentRepositoryError;

fn appointment_to_row(appointment: &Appointment) -> Result<AppointmentRow, Error> {
    Ok(AppointmentRow {
        id: *appointment.id().as_uuid(),
        booking_id: appointment.booking_id().map(|id| *id.as_uuid()),
        appointment_date: appointment.appointment_date(),
        customer_name: appointment.customer_name().to_owned(),
        event_date: appointment.event_date(),
        kind: appointment.kind().as_str().to_owned(),
        status: appointment.status().as_str().to_owned(),
        history: to_json(&appointment.history(), "history").map_err(Error::query)?,
        created_at: appointment.created_at(),
    })
}

fn row_to_appointment(row: AppointmentRow) -> Result<Appointment, Error> {
    Ok(Appointment::restore(AppointmentRecord {
        id: AppointmentId::from_uuid(row.id),
        booking_id: row.booking_id.map(BookingId::from_uuid),
        appointment_date: row.appointment_date,
        customer_name: row.customer_name,
        event_date: row.event_date,
        kind: parse_column(&row.kind, "kind").map_err(Error::query)?,
        status: parse_column(&row.status, "status").map_err(Error::query)?,
        history: from_json(row.history, "history").map_err(Error::query)?,
        created_at: row.created_at,
    }))
}

/// Rows matching `filter`; the appointment date matches a whole UTC day.
fn filtered(filter: Option<&AppointmentFilter>) -> appointments::BoxedQuery<'static, Pg> {
    let mut query = appointments::table.into_boxed();
    let Some(filter) = filter else {
        return query;
    };
    if let Some(day) = filter.appointment_date {
        query = query.filter(appointments::appointment_date.ge(start_of(day)));
        if let Some(next) = day.succ_opt() {
            query = query.filter(appointments::appointment_date.lt(start_of(next)));
        }
    }
    if let Some(name) = filter.customer_name.as_deref() {
        query = query.filter(appointments::customer_name.ilike(contains_pattern(name)));
    }
    if let Some(status) = filter.status {
        query = query.filter(appointments::status.eq(status.as_str()));
    }
    if let Some(kind) = filter.kind {
        query = query.filter(appointments::kind.eq(kind.as_str()));
    }
    query
}

fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn ordered(
    query: appointments::BoxedQuery<'static, Pg>,
    params: &SearchParams<AppointmentFilter>,
) -> appointments::BoxedQuery<'static, Pg> {
    let descending = params.sort_dir() == Some(SortDirection::Desc);
    let query = match params.sort() {
        Some("customer_name") => order_by_column!(query, appointments::customer_name, descending),
        Some("event_date") => order_by_column!(query, appointments::event_date, descending),
        Some("created_at") => order_by_column!(query, appointments::created_at, descending),
        _ => order_by_column!(query, appointments::appointment_date, descending),
    };
    query.then_order_by(appointments::id.asc())
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn save(&self, appointment: &Appointment) -> Result<(), Error> {
        let row = appointment_to_row(appointment)?;
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
        diesel::insert_into(appointments::table)
            .values(&row)
            .on_conflict(appointments::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(Error::from_diesel)
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, Error> {
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
        let row: Option<AppointmentRow> = appointments::table
            .filter(appointments::id.eq(id.as_uuid()))
            .select(AppointmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Error::from_diesel)?;
        row.map(row_to_appointment).transpose()
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, Error> {
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;
        let removed = diesel::delete(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(Error::from_diesel)?;
        Ok(removed > 0)
    }

    async fn search(
        &self,
        params: &SearchParams<AppointmentFilter>,
    ) -> Result<SearchResult<Appointment>, Error> {
        let (offset, limit) = page_window(params).map_err(Error::query)?;
        let mut conn = self.pool.get().await.map_err(Error::from_pool)?;

        let total: i64 = filtered(params.filter())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(Error::from_diesel)?;
        let rows: Vec<AppointmentRow> = ordered(filtered(params.filter()), params)
            .select(AppointmentRow::as_select())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(Error::from_diesel)?;

        let items = rows
            .into_iter()
            .map(row_to_appointment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SearchResult::new(
            items,
            count_to_total(total),
            params.page(),
            params.per_page(),
        ))
    }
}
