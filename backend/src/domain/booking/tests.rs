//! Tests for the booking aggregate.

use chrono::TimeZone;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ProductKind;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0)
        .single()
        .expect("valid fixture instant")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, d).expect("valid fixture date")
}

fn item(cents: i64) -> BookingItem {
    BookingItem::restore(
        BookingItemId::random(),
        Uuid::new_v4(),
        ProductKind::Dress,
        "Azul, Sereia, Cetim".to_owned(),
        Money::from_cents(cents),
        "dresses/azul.png".to_owned(),
        vec![Adjustment {
            label: "Barra".to_owned(),
            description: "Subir 2cm".to_owned(),
        }],
    )
}

fn draft(items: Vec<BookingItem>, amount_paid: Money) -> BookingDraft {
    BookingDraft {
        customer_name: "Joana".to_owned(),
        event_date: day(20),
        expected_period: BookingPeriod::create(day(18), Some(day(21)), day(2))
            .expect("valid fixture period"),
        items,
        amount_paid,
    }
}

#[fixture]
fn pending() -> Booking {
    let mut booking = Booking::create(draft(vec![item(20_000), item(5_000)], Money::ZERO), now());
    booking.drain_events();
    booking
}

#[rstest]
fn create_without_payment_is_pending(pending: Booking) {
    assert_eq!(pending.status(), BookingStatus::PaymentPending);
    assert_eq!(pending.total_booking_price(), Money::from_cents(25_000));
    assert_eq!(pending.remaining_balance(), Money::from_cents(25_000));
    assert!(!pending.notification().has_errors());
}

#[rstest]
fn create_fully_paid_is_ready() {
    let booking = Booking::create(draft(vec![item(10_000)], Money::from_cents(10_000)), now());
    assert_eq!(booking.status(), BookingStatus::Ready);
}

#[rstest]
fn create_flags_missing_items_and_overpayment() {
    let booking = Booking::create(draft(Vec::new(), Money::from_cents(1)), now());
    let notification = booking.notification();
    assert_eq!(notification.field_errors("items"), [ITEMS_REQUIRED]);
    assert_eq!(notification.field_errors("amount_paid"), [PAYMENT_EXCEEDS_TOTAL]);
    assert!(booking.ensure_valid().is_err());
}

#[rstest]
fn partial_payment_keeps_pending(mut pending: Booking) {
    pending.add_payment(Money::from_cents(5_000));
    assert_eq!(pending.amount_paid(), Money::from_cents(5_000));
    assert_eq!(pending.status(), BookingStatus::PaymentPending);
}

#[rstest]
fn full_payment_makes_booking_ready(mut pending: Booking) {
    pending.add_payment(Money::from_cents(5_000));
    pending.add_payment(Money::from_cents(20_000));
    assert_eq!(pending.status(), BookingStatus::Ready);
    let names: Vec<_> = pending.drain_events().iter().map(DomainEvent::name).collect();
    assert_eq!(names, ["booking.payment_added", "booking.payment_added"]);
}

#[rstest]
fn overpayment_leaves_booking_unchanged(mut pending: Booking) {
    pending.add_payment(Money::from_cents(25_001));

    assert_eq!(pending.amount_paid(), Money::ZERO);
    assert_eq!(pending.status(), BookingStatus::PaymentPending);
    assert_eq!(
        pending.notification().field_errors("amount_paid"),
        ["Valor pago não pode ser maior que o valor total da reserva"]
    );
    assert!(pending.drain_events().is_empty());
}

#[rstest]
#[case(0)]
#[case(-100)]
fn non_positive_payment_is_rejected(mut pending: Booking, #[case] cents: i64) {
    pending.add_payment(Money::from_cents(cents));
    assert_eq!(
        pending.notification().field_errors("amount_paid"),
        [PAYMENT_NOT_POSITIVE]
    );
}

#[rstest]
fn start_requires_ready(mut pending: Booking) {
    pending.start(day(18));
    assert_eq!(pending.status(), BookingStatus::PaymentPending);
    assert_eq!(
        pending.notification().field_errors("status"),
        ["Only ready bookings can be started"]
    );
}

#[rstest]
fn full_lifecycle_sets_actual_period(mut pending: Booking) {
    pending.add_payment(Money::from_cents(25_000));
    pending.start(day(18));
    assert_eq!(pending.status(), BookingStatus::InProgress);
    pending.complete(day(22));

    assert_eq!(pending.status(), BookingStatus::Completed);
    assert_eq!(
        pending.actual_period(),
        Some(BookingPeriod::restore(day(18), Some(day(22))))
    );
    assert!(pending.ensure_valid().is_ok());
}

#[rstest]
fn complete_requires_in_progress(mut pending: Booking) {
    pending.complete(day(22));
    assert_eq!(pending.status(), BookingStatus::PaymentPending);
    assert!(pending.notification().has_errors());
}

#[rstest]
fn cancel_from_open_state(mut pending: Booking) {
    pending.cancel();
    assert_eq!(pending.status(), BookingStatus::Cancelled);
}

#[rstest]
fn cancel_twice_records_error(mut pending: Booking) {
    pending.cancel();
    pending.cancel();
    assert_eq!(
        pending.notification().field_errors("status"),
        ["Completed or cancelled bookings cannot be cancelled"]
    );
}

#[rstest]
fn add_many_items_replaces_and_recomputes_status(mut pending: Booking) {
    pending.add_payment(Money::from_cents(10_000));
    pending.add_many_items(vec![item(10_000)]);

    assert_eq!(pending.items().len(), 1);
    assert_eq!(pending.status(), BookingStatus::Ready);
    assert!(!pending.notification().has_errors());
}

#[rstest]
fn add_many_items_below_paid_amount_records_error(mut pending: Booking) {
    pending.add_payment(Money::from_cents(20_000));
    pending.add_many_items(vec![item(5_000)]);

    assert_eq!(
        pending.notification().field_errors("amount_paid"),
        [PAYMENT_EXCEEDS_TOTAL]
    );
}

fn rename(name: &str) -> BookingUpdate {
    BookingUpdate {
        customer_name: Some(name.to_owned()),
        ..BookingUpdate::default()
    }
}

#[rstest]
fn update_revalidates_customer_name(mut pending: Booking) {
    pending.update(rename(""));
    assert_eq!(
        pending.notification().field_errors("customer_name"),
        ["Customer name is required"]
    );
    pending.update(rename("Joana Prado"));
    assert!(!pending.notification().has_errors());
    assert_eq!(pending.customer_name(), "Joana Prado");
}

#[rstest]
fn update_moves_dates_and_records_event(mut pending: Booking) {
    let period = BookingPeriod::restore(day(24), Some(day(26)));
    pending.update(BookingUpdate {
        event_date: Some(day(25)),
        expected_period: Some(period),
        ..BookingUpdate::default()
    });

    assert_eq!(pending.event_date(), day(25));
    assert_eq!(pending.expected_period(), period);
    assert_eq!(
        pending.drain_events(),
        [DomainEvent::from(BookingEvent::Updated { id: pending.id() })]
    );
}

#[rstest]
fn update_after_pick_up_keeps_dates(mut pending: Booking) {
    pending.add_payment(Money::from_cents(25_000));
    pending.start(day(18));
    pending.update(BookingUpdate {
        event_date: Some(day(25)),
        ..BookingUpdate::default()
    });

    assert_eq!(pending.event_date(), day(20));
    assert_eq!(
        pending.notification().field_errors("status"),
        ["Dates cannot be changed after pick-up"]
    );
}

#[rstest]
fn update_on_closed_booking_is_rejected(mut pending: Booking) {
    pending.cancel();
    pending.update(rename("Outra"));

    assert_eq!(pending.customer_name(), "Joana");
    assert_eq!(
        pending.notification().field_errors("status"),
        ["Closed bookings cannot be changed"]
    );
}

#[rstest]
fn filter_trims_customer_name() {
    let filter = BookingFilter {
        customer_name: Some("  ".to_owned()),
        ..BookingFilter::default()
    };
    assert!(filter.normalized().is_none());
}
