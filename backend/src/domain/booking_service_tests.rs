//! Tests for the booking service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockBookingRepository, MockImageStorage, MockProductRepository};
use crate::domain::{Adjustment, BookingStatus, ErrorCode, PAYMENT_EXCEEDS_TOTAL};
use crate::test_support::clock::{MutableClock, fixture_now};
use crate::test_support::events::RecordingEventPublisher;
use crate::test_support::fixtures::{clutch, dress, may};

type Service = BookingService<
    MockBookingRepository,
    MockProductRepository<Dress>,
    MockProductRepository<Clutch>,
>;

struct Mocks {
    bookings: MockBookingRepository,
    dresses: MockProductRepository<Dress>,
    clutches: MockProductRepository<Clutch>,
}

impl Mocks {
    fn new() -> Self {
        Self {
            bookings: MockBookingRepository::new(),
            dresses: MockProductRepository::new(),
            clutches: MockProductRepository::new(),
        }
    }

    fn into_service(self, events: Arc<RecordingEventPublisher>) -> Service {
        let mut storage = MockImageStorage::new();
        storage
            .expect_presigned_url()
            .returning(|key, _| Ok(format!("https://signed.test/{key}")));
        BookingService::new(
            Arc::new(self.bookings),
            ProductCatalogue::new(Arc::new(self.dresses), Arc::new(self.clutches)),
            Arc::new(storage),
            events,
            Arc::new(MutableClock::at_fixture_now()),
        )
    }
}

fn request_for(dress: &Dress, amount_paid: Money) -> CreateBookingRequest {
    CreateBookingRequest {
        customer_name: "Joana Prado".to_owned(),
        event_date: may(20),
        pick_up_date: may(18),
        return_date: Some(may(21)),
        items: vec![BookingItemRequest {
            kind: ProductKind::Dress,
            product_id: dress.core().id(),
            adjustments: vec![Adjustment {
                label: "Barra".to_owned(),
                description: "Subir 2cm".to_owned(),
            }],
        }],
        amount_paid,
    }
}

fn booking_for(dress: &Dress, amount_paid: Money) -> Booking {
    let mut booking = Booking::create(
        BookingDraft {
            customer_name: "Joana Prado".to_owned(),
            event_date: may(20),
            expected_period: BookingPeriod::create(may(18), Some(may(21)), may(2))
                .expect("valid fixture period"),
            items: vec![BookingItem::from_product(dress, Vec::new())],
            amount_paid,
        },
        fixture_now(),
    );
    booking.drain_events();
    booking
}

fn reserved(mut dress: Dress) -> Dress {
    dress.add_reservation_period(Period::new(may(18), may(21)).expect("ordered period"));
    dress.drain_events();
    dress
}

fn picked_up(mut dress: Dress) -> Dress {
    dress.pick_up();
    dress.drain_events();
    dress
}

fn in_progress(dress: &Dress) -> Booking {
    let mut booking = booking_for(dress, Money::from_cents(20_000));
    booking.start(may(18));
    booking.drain_events();
    booking
}

#[rstest]
#[tokio::test]
async fn create_snapshots_and_reserves_products() {
    let stored = dress();
    let request = request_for(&stored, Money::from_cents(5_000));
    let mut mocks = Mocks::new();
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .times(2)
        .returning(move |_| Ok(vec![stored.clone()]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| dress.core().reservation_periods().len() == 1)
        .times(1)
        .returning(|_| Ok(()));
    mocks.clutches.expect_find_by_ids().times(0);
    let events = Arc::new(RecordingEventPublisher::default());

    let view = mocks
        .into_service(events.clone())
        .create(request)
        .await
        .expect("create succeeds");

    let booking = &view.booking;
    assert_eq!(booking.status(), BookingStatus::PaymentPending);
    assert_eq!(booking.total_booking_price(), Money::from_cents(20_000));
    assert_eq!(booking.items()[0].product_name(), "Azul, Tomara que caia, Seda");
    assert_eq!(
        view.image_url(booking.items()[0].id()),
        Some("https://signed.test/dresses/azul.png")
    );
    assert_eq!(events.names(), ["booking.created", "product.reserved"]);
}

#[rstest]
#[tokio::test]
async fn create_with_unknown_product_is_not_found() {
    let missing = dress();
    let mut mocks = Mocks::new();
    mocks.bookings.expect_save().times(0);
    mocks
        .dresses
        .expect_find_by_ids()
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let error = mocks
        .into_service(Arc::default())
        .create(request_for(&missing, Money::ZERO))
        .await
        .expect_err("unknown dress");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(
        error.message(),
        format!("Dress with id(s) {} not found", missing.core().id())
    );
}

#[rstest]
#[tokio::test]
async fn create_with_unordered_period_is_unprocessable() {
    let stored = dress();
    let mut request = request_for(&stored, Money::ZERO);
    request.return_date = Some(may(10));
    let mut mocks = Mocks::new();
    mocks.bookings.expect_save().times(0);
    mocks.dresses.expect_find_by_ids().times(0);

    let error = mocks
        .into_service(Arc::default())
        .create(request)
        .await
        .expect_err("pick-up after return");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
    let details = error.details().expect("details").to_string();
    assert!(details.contains("expected_period"));
    assert!(details.contains("Pick up date cannot be after return date"));
}

#[rstest]
#[tokio::test]
async fn create_over_existing_reservation_saves_nothing() {
    let stored = reserved(dress());
    let request = request_for(&stored, Money::ZERO);
    let mut mocks = Mocks::new();
    mocks.bookings.expect_save().times(0);
    mocks
        .dresses
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![stored.clone()]));
    mocks.dresses.expect_save().times(0);

    let error = mocks
        .into_service(Arc::default())
        .create(request)
        .await
        .expect_err("overlapping reservation");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn overpayment_is_rejected_without_saving() {
    let booking = booking_for(&dress(), Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(0);

    let error = mocks
        .into_service(Arc::default())
        .add_payment(BookingId::random(), Money::from_cents(20_001))
        .await
        .expect_err("overpayment");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
    let details = error.details().expect("details").to_string();
    assert!(details.contains(PAYMENT_EXCEEDS_TOTAL));
}

#[rstest]
#[tokio::test]
async fn full_payment_makes_booking_ready() {
    let booking = booking_for(&dress(), Money::from_cents(5_000));
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks.dresses.expect_find_by_ids().times(0);

    let view = mocks
        .into_service(Arc::default())
        .add_payment(BookingId::random(), Money::from_cents(15_000))
        .await
        .expect("payment succeeds");

    assert_eq!(view.booking.status(), BookingStatus::Ready);
    assert_eq!(view.booking.remaining_balance(), Money::ZERO);
}

#[rstest]
#[tokio::test]
async fn start_picks_up_booked_products() {
    let stored = reserved(dress());
    let booking = booking_for(&stored, Money::from_cents(20_000));
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| dress.core().is_picked_up())
        .times(1)
        .returning(|_| Ok(()));
    let events = Arc::new(RecordingEventPublisher::default());

    let view = mocks
        .into_service(events.clone())
        .start(BookingId::random())
        .await
        .expect("start succeeds");

    assert_eq!(view.booking.status(), BookingStatus::InProgress);
    assert_eq!(events.names(), ["booking.started", "product.picked_up"]);
}

#[rstest]
#[tokio::test]
async fn cancel_releases_reservation() {
    let stored = reserved(dress());
    let booking = booking_for(&stored, Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| dress.core().reservation_periods().is_empty())
        .times(1)
        .returning(|_| Ok(()));

    let view = mocks
        .into_service(Arc::default())
        .cancel(BookingId::random())
        .await
        .expect("cancel succeeds");

    assert_eq!(view.booking.status(), BookingStatus::Cancelled);
}

#[rstest]
#[tokio::test]
async fn start_accepts_products_already_picked_up() {
    let stored = picked_up(reserved(dress()));
    let booking = booking_for(&stored, Money::from_cents(20_000));
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| dress.core().is_picked_up())
        .times(1)
        .returning(|_| Ok(()));
    let events = Arc::new(RecordingEventPublisher::default());

    let view = mocks
        .into_service(events.clone())
        .start(BookingId::random())
        .await
        .expect("start succeeds");

    assert_eq!(view.booking.status(), BookingStatus::InProgress);
    assert_eq!(events.names(), ["booking.started"]);
}

#[rstest]
#[tokio::test]
async fn complete_accepts_products_already_dropped_off() {
    let stored = reserved(dress());
    let booking = in_progress(&stored);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| !dress.core().is_picked_up())
        .times(1)
        .returning(|_| Ok(()));

    let view = mocks
        .into_service(Arc::default())
        .complete(BookingId::random())
        .await
        .expect("complete succeeds");

    assert_eq!(view.booking.status(), BookingStatus::Completed);
}

#[rstest]
#[tokio::test]
async fn cancel_in_progress_drops_off_and_releases() {
    let stored = picked_up(reserved(dress()));
    let booking = in_progress(&stored);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| {
            !dress.core().is_picked_up() && dress.core().reservation_periods().is_empty()
        })
        .times(1)
        .returning(|_| Ok(()));
    let events = Arc::new(RecordingEventPublisher::default());

    let view = mocks
        .into_service(events.clone())
        .cancel(BookingId::random())
        .await
        .expect("cancel succeeds");

    assert_eq!(view.booking.status(), BookingStatus::Cancelled);
    assert_eq!(
        events.names(),
        ["booking.cancelled", "product.dropped_off", "product.released"]
    );
}

#[rstest]
#[tokio::test]
async fn cancel_tolerates_deleted_products() {
    let booking = booking_for(&dress(), Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(|_| Ok(Vec::new()));
    mocks.dresses.expect_save().times(0);

    mocks
        .into_service(Arc::default())
        .cancel(BookingId::random())
        .await
        .expect("cancel succeeds");
}

#[rstest]
#[tokio::test]
async fn replace_items_moves_reservation_to_new_products() {
    let old = reserved(dress());
    let new = clutch();
    let new_id = new.core().id();
    let booking = booking_for(&old, Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![old]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| dress.core().reservation_periods().is_empty())
        .times(1)
        .returning(|_| Ok(()));
    mocks
        .clutches
        .expect_find_by_ids()
        .times(2)
        .returning(move |_| Ok(vec![new.clone()]));
    mocks
        .clutches
        .expect_save()
        .withf(|clutch| clutch.core().reservation_periods().len() == 1)
        .times(1)
        .returning(|_| Ok(()));

    let view = mocks
        .into_service(Arc::default())
        .replace_items(
            BookingId::random(),
            vec![BookingItemRequest {
                kind: ProductKind::Clutch,
                product_id: new_id,
                adjustments: Vec::new(),
            }],
        )
        .await
        .expect("replace succeeds");

    assert_eq!(view.booking.items().len(), 1);
    assert_eq!(view.booking.items()[0].kind(), ProductKind::Clutch);
    assert_eq!(view.booking.total_booking_price(), Money::from_cents(5_000));
}

#[rstest]
#[tokio::test]
async fn deleting_closed_booking_leaves_products_alone() {
    let mut booking = booking_for(&dress(), Money::ZERO);
    booking.cancel();
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_delete().times(1).returning(|_| Ok(true));
    mocks.dresses.expect_find_by_ids().times(0);

    mocks
        .into_service(Arc::default())
        .delete(BookingId::random())
        .await
        .expect("delete succeeds");
}

fn move_to(pick_up: u32, ret: u32) -> BookingChanges {
    BookingChanges {
        pick_up_date: Some(may(pick_up)),
        return_date: Some(may(ret)),
        ..BookingChanges::default()
    }
}

#[rstest]
#[tokio::test]
async fn update_moves_reservation_with_dates() {
    let stored = reserved(dress());
    let booking = booking_for(&stored, Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| {
            dress.core().reservation_periods()
                == [Period::new(may(24), may(26)).expect("ordered period")]
        })
        .times(1)
        .returning(|_| Ok(()));
    let events = Arc::new(RecordingEventPublisher::default());

    let view = mocks
        .into_service(events.clone())
        .update(BookingId::random(), move_to(24, 26))
        .await
        .expect("update succeeds");

    assert_eq!(view.booking.expected_period().pick_up_date(), may(24));
    assert_eq!(
        events.names(),
        ["booking.updated", "product.released", "product.reserved"]
    );
}

#[rstest]
#[tokio::test]
async fn update_into_taken_dates_is_a_conflict() {
    let mut stored = reserved(dress());
    stored.add_reservation_period(Period::new(may(25), may(27)).expect("ordered period"));
    stored.drain_events();
    let booking = booking_for(&stored, Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(0);
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks.dresses.expect_save().times(0);

    let error = mocks
        .into_service(Arc::default())
        .update(BookingId::random(), move_to(24, 26))
        .await
        .expect_err("overlapping dates");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_of_customer_name_leaves_products_alone() {
    let booking = booking_for(&dress(), Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(1).returning(|_| Ok(()));
    mocks.dresses.expect_find_by_ids().times(0);

    let view = mocks
        .into_service(Arc::default())
        .update(
            BookingId::random(),
            BookingChanges {
                customer_name: Some("Joana Prado Lima".to_owned()),
                ..BookingChanges::default()
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(view.booking.customer_name(), "Joana Prado Lima");
}

#[rstest]
#[tokio::test]
async fn update_into_the_past_is_unprocessable() {
    let booking = booking_for(&dress(), Money::ZERO);
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_save().times(0);
    mocks.dresses.expect_find_by_ids().times(0);

    let error = mocks
        .into_service(Arc::default())
        .update(
            BookingId::random(),
            BookingChanges {
                pick_up_date: Some(may(1)),
                ..BookingChanges::default()
            },
        )
        .await
        .expect_err("pick-up in the past");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
    assert!(
        error
            .details()
            .expect("details")
            .to_string()
            .contains(crate::domain::PICK_UP_IN_PAST)
    );
}

#[rstest]
#[tokio::test]
async fn deleting_completed_booking_releases_reservation() {
    let stored = reserved(dress());
    let mut booking = in_progress(&stored);
    booking.complete(may(21));
    booking.drain_events();
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(booking)));
    mocks.bookings.expect_delete().times(1).returning(|_| Ok(true));
    mocks
        .dresses
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![stored]));
    mocks
        .dresses
        .expect_save()
        .withf(|dress| dress.core().reservation_periods().is_empty())
        .times(1)
        .returning(|_| Ok(()));

    mocks
        .into_service(Arc::default())
        .delete(BookingId::random())
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn missing_booking_is_not_found() {
    let mut mocks = Mocks::new();
    mocks
        .bookings
        .expect_find_by_id()
        .return_once(|_| Ok(None));
    let id = BookingId::random();

    let error = mocks
        .into_service(Arc::default())
        .get(id)
        .await
        .expect_err("unknown booking");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), format!("Booking with id(s) {id} not found"));
}
