//! Port error enums with their mapping onto domain error codes.
//!
//! Each variant names the [`ErrorCode`](crate::domain::ErrorCode) it
//! surfaces as, so services can propagate adapter failures with `?`:
//!
//! ```text
//! define_port_error! {
//!     pub enum ImageStorageError {
//!         Upload { message: String } => ServiceUnavailable: "image upload failed: {message}",
//!     }
//! }
//! ```
//!
//! Besides the `thiserror::Error` derive, the macro generates:
//!
//! - a snake_case constructor per variant, taking `impl Into<_>` per field;
//! - `code()`;
//! - `From<_> for crate::domain::Error`, keeping the display message.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $code:ident : $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Domain error code this failure surfaces as.
            pub const fn code(&self) -> $crate::domain::ErrorCode {
                match self {
                    $( Self::$variant { .. } => $crate::domain::ErrorCode::$code, )*
                }
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(value: $name) -> Self {
                Self::new(value.code(), value.to_string())
            }
        }
    };
}

pub(crate) use define_port_error;
