//! HS256 JSON Web Token codec.
//!
//! Tokens carry the username as `sub` plus `iat`/`exp` in seconds. Expiry
//! is checked without leeway so a token stops working the second it lapses.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{AccessToken, AuthenticatedUser};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Build a codec over `secret`. The caller keeps ownership of the bytes
    /// and should zeroize them once the codec exists.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<AccessToken, TokenCodecError> {
        let claims = Claims {
            sub: username.to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenCodecError::encode(err.to_string()))?;
        Ok(AccessToken::new(token, expires_at))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenCodecError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenCodecError::expired(),
                _ => TokenCodecError::invalid(err.to_string()),
            }
        })?;
        Ok(AuthenticatedUser::new(data.claims.sub))
    }
}
