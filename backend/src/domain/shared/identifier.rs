//! UUID-backed aggregate identifiers.
//!
//! Every aggregate gets its own newtype so ids cannot be mixed up across
//! repositories. Parsing failures surface as [`InvalidValueObject`].

use uuid::Uuid;

use super::InvalidValueObject;

/// Message recorded when a raw id is not a UUID.
pub const INVALID_ID_MESSAGE: &str = "ID must be a valid UUID";

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, InvalidValueObject> {
    Uuid::parse_str(raw.trim()).map_err(|_| InvalidValueObject::new(INVALID_ID_MESSAGE))
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::utoipa::ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }

            /// Parse a textual UUID.
            pub fn parse(raw: &str) -> Result<Self, $crate::domain::InvalidValueObject> {
                $crate::domain::shared::identifier::parse_uuid(raw).map(Self)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::InvalidValueObject;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use define_identifier;
