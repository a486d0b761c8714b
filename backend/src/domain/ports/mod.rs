//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, image storage, event publishing, token
//! signing) are implemented under `outbound`. Driving ports (commands,
//! queries, login) are implemented by the domain services and called by
//! the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_command;
mod appointment_query;
mod appointment_repository;
mod booking_command;
mod booking_query;
mod booking_repository;
mod domain_event_publisher;
mod image_storage;
mod login_service;
mod product_command;
mod product_query;
mod product_repository;
mod token_codec;

#[cfg(test)]
pub use appointment_command::MockAppointmentCommand;
pub use appointment_command::{AppointmentChanges, AppointmentCommand};
#[cfg(test)]
pub use appointment_query::MockAppointmentQuery;
pub use appointment_query::AppointmentQuery;
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{
    AppointmentRepository, AppointmentRepositoryError, FixtureAppointmentRepository,
};
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{
    BookingChanges, BookingCommand, BookingItemRequest, CreateBookingRequest,
};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::{BookingQuery, BookingView};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{
    BookingRepository, BookingRepositoryError, FixtureBookingRepository,
};
#[cfg(test)]
pub use domain_event_publisher::MockDomainEventPublisher;
pub use domain_event_publisher::{
    DomainEventPublisher, DomainEventPublisherError, FixtureDomainEventPublisher,
};
#[cfg(test)]
pub use image_storage::MockImageStorage;
pub use image_storage::{FixtureImageStorage, ImageStorage, ImageStorageError, ImageUpload};
#[cfg(test)]
pub use login_service::{MockAccessTokenVerifier, MockLoginService};
pub use login_service::{AccessTokenVerifier, FIXTURE_TOKEN, FixtureLoginService, LoginService};
#[cfg(test)]
pub use product_command::MockProductCommand;
pub use product_command::ProductCommand;
#[cfg(test)]
pub use product_query::MockProductQuery;
pub use product_query::{ProductQuery, ProductView};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{
    FixtureProductRepository, ProductRepository, ProductRepositoryError,
};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
