//! Building blocks shared by every aggregate: identifiers, value objects,
//! validation plumbing and the event outbox.

mod aggregate;
mod entity_error;
pub(crate) mod identifier;
mod money;
mod notification;
mod outbox;
mod period;
mod string_enum;
mod validation;

pub use aggregate::AggregateRoot;
pub use entity_error::{EntityNotFoundError, EntityValidationError, InvalidValueObject};
pub(crate) use identifier::define_identifier;
pub use identifier::INVALID_ID_MESSAGE;
pub use money::Money;
pub use notification::Notification;
pub use outbox::Outbox;
pub(crate) use string_enum::string_enum;
pub use period::{END_BEFORE_START_MESSAGE, Period};
pub use validation::{Rule, ValidationRules, is_present, max_chars};
