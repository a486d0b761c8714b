//! Driving ports for logging in and checking access tokens.
//!
//! Inbound adapters call these to authenticate credentials and requests
//! without knowing which user store or token format sits behind them.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::{AccessToken, AuthenticatedUser, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue an access token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}

/// Port used by request extractors to resolve the caller.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenVerifier: Send + Sync {
    /// Resolve the user a token was issued to.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, Error>;
}

/// Fixture token accepted by [`FixtureLoginService`].
pub const FIXTURE_TOKEN: &str = "fixture-token";

/// In-memory authenticator for tests and local wiring.
///
/// `admin` / `password` authenticates and receives [`FIXTURE_TOKEN`], which
/// the same type accepts as a verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        if credentials.username() == "admin" && credentials.password() == "password" {
            Ok(AccessToken::new(FIXTURE_TOKEN, Utc::now() + Duration::hours(1)))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

impl AccessTokenVerifier for FixtureLoginService {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        if token == FIXTURE_TOKEN {
            Ok(AuthenticatedUser::new("admin"))
        } else {
            Err(Error::unauthorized("invalid access token"))
        }
    }
}
