//! Port for signing and verifying access tokens.

use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, AuthenticatedUser};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenCodecError {
        /// The token could not be signed.
        Encode { message: String } => InternalError:
            "token encoding failed: {message}",
        /// The token is malformed or its signature does not match.
        Invalid { message: String } => Unauthorized:
            "token is invalid: {message}",
        /// The token was valid but has expired.
        Expired => Unauthorized:
            "token has expired",
    }
}

/// Port for issuing and checking signed access tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `username` valid until `expires_at`.
    fn issue(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<AccessToken, TokenCodecError>;

    /// Check a token's signature and expiry and return its subject.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenCodecError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(TokenCodecError::expired(), "token has expired")]
    #[case(TokenCodecError::invalid("bad signature"), "token is invalid: bad signature")]
    fn errors_render_messages(#[case] err: TokenCodecError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }
}
