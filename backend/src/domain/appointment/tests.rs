//! Tests for the appointment aggregate and its search filter.

use chrono::{Duration, TimeZone};
use pagination::{RawSearchParams, SearchParams};
use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 10, 9, 0, 0)
        .single()
        .expect("valid fixture instant")
}

fn draft(now: DateTime<Utc>) -> AppointmentDraft {
    AppointmentDraft {
        booking_id: None,
        appointment_date: now + Duration::days(2),
        customer_name: "Maria Silva".to_owned(),
        event_date: NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid fixture date"),
        kind: AppointmentKind::InitialVisit,
    }
}

#[fixture]
fn scheduled(now: DateTime<Utc>) -> Appointment {
    let mut appointment = Appointment::create(draft(now), now);
    appointment.drain_events();
    appointment
}

#[rstest]
fn create_starts_scheduled_with_one_history_entry(now: DateTime<Utc>) {
    let mut appointment = Appointment::create(draft(now), now);

    assert_eq!(appointment.status(), AppointmentStatus::Scheduled);
    assert_eq!(
        appointment.history(),
        [AppointmentHistoryEntry {
            status: AppointmentStatus::Scheduled,
            date: now,
        }]
    );
    assert!(!appointment.notification().has_errors());
    let events = appointment.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events.first().map(DomainEvent::name), Some("appointment.scheduled"));
}

#[rstest]
#[case("", CUSTOMER_NAME_REQUIRED)]
#[case("   ", CUSTOMER_NAME_REQUIRED)]
fn create_flags_blank_customer_name(now: DateTime<Utc>, #[case] name: &str, #[case] message: &str) {
    let appointment = Appointment::create(
        AppointmentDraft {
            customer_name: name.to_owned(),
            ..draft(now)
        },
        now,
    );
    assert_eq!(appointment.notification().field_errors("customer_name"), [message]);
}

#[rstest]
fn create_flags_long_customer_name(now: DateTime<Utc>) {
    let appointment = Appointment::create(
        AppointmentDraft {
            customer_name: "x".repeat(CUSTOMER_NAME_MAX + 1),
            ..draft(now)
        },
        now,
    );
    assert_eq!(
        appointment.notification().field_errors("customer_name"),
        [CUSTOMER_NAME_TOO_LONG]
    );
}

#[rstest]
fn create_flags_past_appointment_date(now: DateTime<Utc>) {
    let appointment = Appointment::create(
        AppointmentDraft {
            appointment_date: now - Duration::hours(1),
            ..draft(now)
        },
        now,
    );
    assert_eq!(
        appointment.notification().field_errors("appointment_date"),
        [APPOINTMENT_DATE_IN_PAST]
    );
    assert!(appointment.ensure_valid().is_err());
}

#[rstest]
fn cancel_appends_history(mut scheduled: Appointment, now: DateTime<Utc>) {
    let later = now + Duration::hours(3);
    scheduled.cancel(later);

    assert_eq!(scheduled.status(), AppointmentStatus::Cancelled);
    assert_eq!(scheduled.history().len(), 2);
    assert_eq!(
        scheduled.history().last(),
        Some(&AppointmentHistoryEntry {
            status: AppointmentStatus::Cancelled,
            date: later,
        })
    );
    assert!(scheduled.ensure_valid().is_ok());
}

#[rstest]
fn cancelling_twice_records_status_error(mut scheduled: Appointment, now: DateTime<Utc>) {
    scheduled.cancel(now);
    scheduled.cancel(now);

    assert_eq!(scheduled.status(), AppointmentStatus::Cancelled);
    assert_eq!(scheduled.history().len(), 2);
    assert_eq!(
        scheduled.notification().field_errors("status"),
        ["Only scheduled appointments can be cancelled"]
    );
}

#[rstest]
fn complete_after_cancel_is_rejected(mut scheduled: Appointment, now: DateTime<Utc>) {
    scheduled.cancel(now);
    scheduled.complete(now);

    assert_eq!(scheduled.status(), AppointmentStatus::Cancelled);
    assert_eq!(
        scheduled.notification().field_errors("status"),
        ["Only scheduled appointments can be completed"]
    );
}

#[rstest]
fn complete_moves_to_completed(mut scheduled: Appointment, now: DateTime<Utc>) {
    scheduled.complete(now);

    assert_eq!(scheduled.status(), AppointmentStatus::Completed);
    let names: Vec<_> = scheduled.drain_events().iter().map(DomainEvent::name).collect();
    assert_eq!(names, ["appointment.completed"]);
}

#[rstest]
fn reschedule_keeps_status_and_appends_history(mut scheduled: Appointment, now: DateTime<Utc>) {
    let new_date = now + Duration::days(5);
    scheduled.reschedule(new_date, now);

    assert_eq!(scheduled.status(), AppointmentStatus::Scheduled);
    assert_eq!(scheduled.appointment_date(), new_date);
    assert_eq!(scheduled.history().len(), 2);
}

#[rstest]
fn reschedule_into_the_past_leaves_date_untouched(mut scheduled: Appointment, now: DateTime<Utc>) {
    let original = scheduled.appointment_date();
    scheduled.reschedule(now - Duration::days(1), now);

    assert_eq!(scheduled.appointment_date(), original);
    assert_eq!(scheduled.history().len(), 1);
    assert_eq!(
        scheduled.notification().field_errors("appointment_date"),
        [APPOINTMENT_DATE_IN_PAST]
    );
}

#[rstest]
fn change_customer_name_revalidates_only_that_field(mut scheduled: Appointment) {
    scheduled.change_customer_name(" ");
    assert_eq!(
        scheduled.notification().field_errors("customer_name"),
        [CUSTOMER_NAME_REQUIRED]
    );

    scheduled.change_customer_name("Joana");
    assert!(!scheduled.notification().has_errors());
    assert_eq!(scheduled.customer_name(), "Joana");
}

#[rstest]
fn restore_skips_validation(now: DateTime<Utc>) {
    let appointment = Appointment::restore(AppointmentRecord {
        id: AppointmentId::random(),
        booking_id: Some(BookingId::random()),
        appointment_date: now - Duration::days(30),
        customer_name: "Maria".to_owned(),
        event_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid fixture date"),
        kind: AppointmentKind::Return,
        status: AppointmentStatus::Completed,
        history: Vec::new(),
        created_at: now - Duration::days(40),
    });
    assert!(!appointment.notification().has_errors());
    assert_eq!(appointment.status(), AppointmentStatus::Completed);
}

#[rstest]
fn filter_with_only_customer_name_keeps_other_criteria_empty() {
    let params = SearchParams::create(RawSearchParams {
        filter: Some(AppointmentFilter {
            customer_name: Some("John Doe".to_owned()),
            ..AppointmentFilter::default()
        }),
        ..RawSearchParams::default()
    });
    let filter = params.filter().expect("filter kept");
    assert_eq!(filter.appointment_date, None);
    assert_eq!(filter.customer_name.as_deref(), Some("John Doe"));
}

#[rstest]
fn blank_filter_collapses_to_none() {
    let params = SearchParams::create(RawSearchParams {
        filter: Some(AppointmentFilter {
            customer_name: Some("   ".to_owned()),
            ..AppointmentFilter::default()
        }),
        ..RawSearchParams::default()
    });
    assert!(params.filter().is_none());
}

#[rstest]
#[case("INITIAL_VISIT", AppointmentKind::InitialVisit)]
#[case("RETURN_FOR_ADJUSTMENT", AppointmentKind::ReturnForAdjustment)]
#[case("PICKUP", AppointmentKind::Pickup)]
#[case("RETURN", AppointmentKind::Return)]
fn kind_text_round_trips(#[case] raw: &str, #[case] kind: AppointmentKind) {
    assert_eq!(raw.parse::<AppointmentKind>().expect("known kind"), kind);
    assert_eq!(kind.as_str(), raw);
}
