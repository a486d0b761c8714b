//! Tests for the appointment service.

use std::sync::Arc;

use chrono::{Duration, TimeZone};
use pagination::RawSearchParams;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{AppointmentRepositoryError, MockAppointmentRepository};
use crate::domain::{
    AppointmentHistoryEntry, AppointmentKind, AppointmentRecord, AppointmentStatus, ErrorCode,
};
use crate::test_support::clock::{MutableClock, fixture_now};
use crate::test_support::events::RecordingEventPublisher;
use crate::test_support::fixtures::may;

fn draft(appointment_date: DateTime<Utc>) -> AppointmentDraft {
    AppointmentDraft {
        booking_id: None,
        appointment_date,
        customer_name: "Joana Prado".to_owned(),
        event_date: may(20),
        kind: AppointmentKind::InitialVisit,
    }
}

fn stored(status: AppointmentStatus) -> Appointment {
    let appointment_date = fixture_now() + Duration::days(3);
    Appointment::restore(AppointmentRecord {
        id: AppointmentId::random(),
        booking_id: None,
        appointment_date,
        customer_name: "Joana Prado".to_owned(),
        event_date: may(20),
        kind: AppointmentKind::InitialVisit,
        status,
        history: vec![AppointmentHistoryEntry {
            status,
            date: fixture_now(),
        }],
        created_at: fixture_now(),
    })
}

struct Harness {
    events: Arc<RecordingEventPublisher>,
    clock: Arc<MutableClock>,
}

impl Harness {
    fn service(
        &self,
        repo: MockAppointmentRepository,
    ) -> AppointmentService<MockAppointmentRepository> {
        AppointmentService::new(Arc::new(repo), self.events.clone(), self.clock.clone())
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        events: Arc::new(RecordingEventPublisher::default()),
        clock: Arc::new(MutableClock::at_fixture_now()),
    }
}

fn repo_returning(appointment: Appointment) -> MockAppointmentRepository {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(appointment)));
    repo
}

#[rstest]
#[tokio::test]
async fn schedule_persists_and_publishes(harness: Harness) {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_save().times(1).return_once(|_| Ok(()));
    let service = harness.service(repo);

    let appointment = service
        .schedule(draft(fixture_now() + Duration::days(1)))
        .await
        .expect("schedule succeeds");

    assert_eq!(appointment.status(), AppointmentStatus::Scheduled);
    assert_eq!(harness.events.names(), ["appointment.scheduled"]);
}

#[rstest]
#[tokio::test]
async fn schedule_in_the_past_is_unprocessable(harness: Harness) {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_save().times(0);
    let service = harness.service(repo);

    let error = service
        .schedule(draft(fixture_now() - Duration::hours(1)))
        .await
        .expect_err("past date is rejected");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
    let details = error.details().expect("notification details");
    assert!(details.to_string().contains("appointment_date"));
    assert!(harness.events.names().is_empty());
}

#[rstest]
#[tokio::test]
async fn cancel_scheduled_appointment(harness: Harness) {
    let mut repo = repo_returning(stored(AppointmentStatus::Scheduled));
    repo.expect_save().times(1).return_once(|_| Ok(()));
    let service = harness.service(repo);
    let id = AppointmentId::random();

    let appointment = service.cancel(id).await.expect("cancel succeeds");

    assert_eq!(appointment.status(), AppointmentStatus::Cancelled);
    assert_eq!(appointment.history().len(), 2);
    assert_eq!(harness.events.names(), ["appointment.cancelled"]);
}

#[rstest]
#[tokio::test]
async fn cancel_cancelled_appointment_is_rejected(harness: Harness) {
    let mut repo = repo_returning(stored(AppointmentStatus::Cancelled));
    repo.expect_save().times(0);
    let service = harness.service(repo);

    let error = service
        .cancel(AppointmentId::random())
        .await
        .expect_err("second cancel fails");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[tokio::test]
async fn missing_appointment_is_not_found(harness: Harness) {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    let service = harness.service(repo);
    let id = AppointmentId::random();

    let error = service.complete(id).await.expect_err("unknown id");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(
        error.message(),
        format!("Appointment with id(s) {id} not found")
    );
}

#[rstest]
#[tokio::test]
async fn reschedule_uses_clock_for_past_check(harness: Harness) {
    let mut repo = repo_returning(stored(AppointmentStatus::Scheduled));
    repo.expect_save().times(1).return_once(|_| Ok(()));
    let new_date = Utc
        .with_ymd_and_hms(2026, 5, 10, 15, 0, 0)
        .single()
        .expect("valid instant");
    let service = harness.service(repo);

    let appointment = service
        .reschedule(AppointmentId::random(), new_date)
        .await
        .expect("reschedule succeeds");

    assert_eq!(appointment.appointment_date(), new_date);
    assert_eq!(appointment.status(), AppointmentStatus::Scheduled);
}

#[rstest]
#[tokio::test]
async fn update_changes_customer_details(harness: Harness) {
    let mut repo = repo_returning(stored(AppointmentStatus::Scheduled));
    repo.expect_save().times(1).return_once(|_| Ok(()));
    let service = harness.service(repo);

    let appointment = service
        .update(
            AppointmentId::random(),
            AppointmentChanges {
                customer_name: Some("Joana P. Lima".to_owned()),
                event_date: Some(may(25)),
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(appointment.customer_name(), "Joana P. Lima");
    assert_eq!(appointment.event_date(), may(25));
}

#[rstest]
#[tokio::test]
async fn update_with_blank_name_is_unprocessable(harness: Harness) {
    let mut repo = repo_returning(stored(AppointmentStatus::Scheduled));
    repo.expect_save().times(0);
    let service = harness.service(repo);

    let error = service
        .update(
            AppointmentId::random(),
            AppointmentChanges {
                customer_name: Some("  ".to_owned()),
                event_date: None,
            },
        )
        .await
        .expect_err("blank name fails");

    assert_eq!(error.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_rows(
    harness: Harness,
    #[case] removed: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_delete().times(1).return_once(move |_| Ok(removed));
    let service = harness.service(repo);

    let result = service.delete(AppointmentId::random()).await;

    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[rstest]
#[tokio::test]
async fn connection_failure_maps_to_service_unavailable(harness: Harness) {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_search()
        .times(1)
        .return_once(|_| Err(AppointmentRepositoryError::connection("refused")));
    let service = harness.service(repo);

    let error = service
        .search(SearchParams::create(RawSearchParams::default()))
        .await
        .expect_err("search fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn search_passes_normalised_filter(harness: Harness) {
    let mut repo = MockAppointmentRepository::new();
    repo.expect_search()
        .withf(|params| {
            params
                .filter()
                .and_then(|filter| filter.customer_name.as_deref())
                == Some("John Doe")
        })
        .times(1)
        .return_once(|params| Ok(SearchResult::empty(params.page(), params.per_page())));
    let service = harness.service(repo);

    let result = service
        .search(SearchParams::create(RawSearchParams {
            filter: Some(AppointmentFilter {
                customer_name: Some(" John Doe ".to_owned()),
                ..AppointmentFilter::default()
            }),
            ..RawSearchParams::default()
        }))
        .await
        .expect("search succeeds");

    assert_eq!(result.total(), 0);
}
