//! Test utilities for the atelier crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod clock {
    //! Clock doubles for date-sensitive rules.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Clock whose current instant is set by the test.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        /// Start at `now`.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Start at [`fixture_now`].
        pub fn at_fixture_now() -> Self {
            Self::new(fixture_now())
        }

        /// Move the clock forward by whole days.
        pub fn advance_days(&self, days: i64) {
            *self.lock_clock() += TimeDelta::days(days);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }

    /// Fixed instant used across fixtures: 2026-05-02 10:00 UTC.
    pub fn fixture_now() -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).single() {
            Some(now) => now,
            None => panic!("fixture instant is unambiguous"),
        }
    }
}

pub mod events {
    //! Event publisher that keeps what it receives.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::DomainEvent;
    use crate::domain::ports::{DomainEventPublisher, DomainEventPublisherError};

    /// Publisher recording every event in arrival order.
    #[derive(Default)]
    pub struct RecordingEventPublisher(Mutex<Vec<DomainEvent>>);

    impl RecordingEventPublisher {
        /// Dotted names of the recorded events.
        pub fn names(&self) -> Vec<&'static str> {
            self.lock_events().iter().map(DomainEvent::name).collect()
        }

        fn lock_events(&self) -> std::sync::MutexGuard<'_, Vec<DomainEvent>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("publisher mutex"),
            }
        }
    }

    #[async_trait]
    impl DomainEventPublisher for RecordingEventPublisher {
        async fn publish(
            &self,
            events: Vec<DomainEvent>,
        ) -> Result<(), DomainEventPublisherError> {
            self.lock_events().extend(events);
            Ok(())
        }
    }
}

pub mod fixtures {
    //! Sample aggregates and drafts.

    use chrono::NaiveDate;

    use crate::domain::ports::ImageUpload;
    use crate::domain::{
        AggregateRoot, Clutch, ClutchDraft, Dress, DressDraft, Money, Product, ProductDraft,
    };

    use super::clock::fixture_now;

    /// A date in May 2026, after [`fixture_now`](super::clock::fixture_now).
    pub fn may(day: u32) -> NaiveDate {
        match NaiveDate::from_ymd_opt(2026, 5, day) {
            Some(date) => date,
            None => panic!("invalid fixture day {day}"),
        }
    }

    /// Blue silk strapless dress renting for 200.00.
    pub fn dress_draft() -> DressDraft {
        DressDraft {
            product: ProductDraft {
                rent_price: Money::from_cents(20_000),
                color: "Azul".to_owned(),
                model: "Tomara que caia".to_owned(),
            },
            fabric: "Seda".to_owned(),
        }
    }

    /// Golden envelope clutch renting for 50.00.
    pub fn clutch_draft() -> ClutchDraft {
        ProductDraft {
            rent_price: Money::from_cents(5_000),
            color: "Dourada".to_owned(),
            model: "Envelope".to_owned(),
        }
    }

    /// Valid dress with its creation events drained.
    pub fn dress() -> Dress {
        let mut dress = Dress::create(dress_draft(), "dresses/azul.png".to_owned(), fixture_now());
        dress.drain_events();
        dress
    }

    /// Valid clutch with its creation events drained.
    pub fn clutch() -> Clutch {
        let mut clutch = Clutch::create(
            clutch_draft(),
            "clutches/dourada.png".to_owned(),
            fixture_now(),
        );
        clutch.drain_events();
        clutch
    }

    /// Tiny PNG upload.
    pub fn png_upload(name: &str) -> ImageUpload {
        ImageUpload {
            name: name.to_owned(),
            bytes: vec![0x89, b'P', b'N', b'G'],
            content_type: "image/png".to_owned(),
        }
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic if not an Object.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            _ => panic!("schema '{name}' is not an Object"),
        }
    }

    /// Get a property from an Object schema by name.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}

pub mod http {
    //! HTTP state wired over in-memory adapters.

    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::ports::{FIXTURE_TOKEN, FixtureLoginService};
    use crate::inbound::http::state::{DrivenAdapters, HttpState, HttpStatePorts};
    use crate::outbound::memory::{
        InMemoryAppointmentRepository, InMemoryBookingRepository, InMemoryClutchRepository,
        InMemoryDressRepository,
    };
    use crate::outbound::storage::InMemoryImageStorage;

    use super::clock::MutableClock;
    use super::events::RecordingEventPublisher;

    /// `Authorization` header value accepted by the fixture verifier.
    pub fn bearer() -> (&'static str, String) {
        ("Authorization", format!("Bearer {FIXTURE_TOKEN}"))
    }

    /// In-memory adapters kept reachable so tests can inspect them.
    #[derive(Clone)]
    pub struct InMemoryBackend {
        pub appointments: Arc<InMemoryAppointmentRepository>,
        pub bookings: Arc<InMemoryBookingRepository>,
        pub dresses: Arc<InMemoryDressRepository>,
        pub clutches: Arc<InMemoryClutchRepository>,
        pub storage: Arc<InMemoryImageStorage>,
        pub events: Arc<RecordingEventPublisher>,
        pub clock: Arc<MutableClock>,
    }

    impl Default for InMemoryBackend {
        fn default() -> Self {
            Self {
                appointments: Arc::new(InMemoryAppointmentRepository::new()),
                bookings: Arc::new(InMemoryBookingRepository::new()),
                dresses: Arc::new(InMemoryDressRepository::new()),
                clutches: Arc::new(InMemoryClutchRepository::new()),
                storage: Arc::new(InMemoryImageStorage::new()),
                events: Arc::new(RecordingEventPublisher::default()),
                clock: Arc::new(MutableClock::at_fixture_now()),
            }
        }
    }

    impl InMemoryBackend {
        /// Empty repositories and a clock at
        /// [`fixture_now`](super::clock::fixture_now).
        pub fn new() -> Self {
            Self::default()
        }

        /// Use-case ports over these adapters, authenticated by
        /// [`FixtureLoginService`].
        pub fn ports(&self) -> HttpStatePorts {
            HttpStatePorts::from_adapters(
                DrivenAdapters {
                    appointments: Arc::clone(&self.appointments),
                    bookings: Arc::clone(&self.bookings),
                    dresses: Arc::clone(&self.dresses),
                    clutches: Arc::clone(&self.clutches),
                    storage: self.storage.clone(),
                    events: self.events.clone(),
                    clock: self.clock.clone(),
                    presign_ttl: Duration::from_secs(900),
                },
                Arc::new(FixtureLoginService),
                Arc::new(FixtureLoginService),
            )
        }

        /// Handler state with insecure cookies for plain HTTP tests.
        pub fn state(&self) -> HttpState {
            HttpState::new(self.ports()).with_cookie_secure(false)
        }
    }

    /// Ports over a fresh [`InMemoryBackend`].
    pub fn fixture_ports() -> HttpStatePorts {
        InMemoryBackend::new().ports()
    }

    const BOUNDARY: &str = "atelier-test-boundary";

    /// File part of a [`multipart_body`].
    pub struct FilePart<'a> {
        pub filename: &'a str,
        pub content_type: &'a str,
        pub bytes: &'a [u8],
    }

    /// A small PNG file part.
    pub fn png_part() -> FilePart<'static> {
        FilePart {
            filename: "vestido.png",
            content_type: "image/png",
            bytes: &[0x89, b'P', b'N', b'G', 0x0d, 0x0a],
        }
    }

    /// Encode a `multipart/form-data` body with text `fields` and an
    /// optional `image` file.
    ///
    /// Returns the `Content-Type` header value and the body.
    pub fn multipart_body(fields: &[(&str, &str)], image: Option<FilePart<'_>>) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(file) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    file.filename, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(file.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }
}
