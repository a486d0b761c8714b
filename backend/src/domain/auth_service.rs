//! Authentication service backed by configured users and a token codec.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{AccessTokenVerifier, LoginService, TokenCodec, TokenCodecError};
use crate::domain::{AccessToken, AuthenticatedUser, Error, LoginCredentials, StaticUser};

/// Default lifetime of an issued access token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(8);

/// Logs configured users in and verifies the tokens it issued.
pub struct AuthService<T> {
    users: Vec<StaticUser>,
    codec: Arc<T>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl<T> Clone for AuthService<T> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            codec: Arc::clone(&self.codec),
            clock: Arc::clone(&self.clock),
            token_ttl: self.token_ttl,
        }
    }
}

impl<T> AuthService<T> {
    /// Create a service for `users`, signing tokens with `codec`.
    pub fn new(users: Vec<StaticUser>, codec: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            codec,
            clock,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Override how long issued tokens stay valid.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}

#[async_trait]
impl<T> LoginService for AuthService<T>
where
    T: TokenCodec + 'static,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(user) = self.users.iter().find(|user| user.matches(credentials)) else {
            warn!(username = credentials.username(), "login rejected");
            return Err(Error::unauthorized("invalid credentials"));
        };
        let issued_at = self.clock.utc();
        let token = self
            .codec
            .issue(user.username(), issued_at, issued_at + self.token_ttl)
            .map_err(|err| Error::internal(format!("failed to issue access token: {err}")))?;
        info!(username = user.username(), "login succeeded");
        Ok(token)
    }
}

impl<T> AccessTokenVerifier for AuthService<T>
where
    T: TokenCodec,
{
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        self.codec.verify(token).map_err(|err| match err {
            TokenCodecError::Expired => Error::unauthorized("access token has expired"),
            TokenCodecError::Invalid { .. } | TokenCodecError::Encode { .. } => {
                Error::unauthorized("invalid access token")
            }
        })
    }
}
