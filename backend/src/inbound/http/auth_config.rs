//! Authentication configuration parsing and validation.
//!
//! The JWT signing secret, the cookie `Secure` toggle and the static user
//! list come from the environment. Debug builds fall back to development
//! defaults with a warning; release builds refuse to start without explicit,
//! valid values.

use std::path::PathBuf;

use mockable::Env;
use tracing::warn;
use uuid::Uuid;
use zeroize::{Zeroize, Zeroizing};

use crate::domain::StaticUser;

const JWT_SECRET_DEFAULT_PATH: &str = "/var/run/secrets/jwt_secret";
const JWT_SECRET_MIN_LEN: usize = 32;
const JWT_SECRET_FILE_ENV: &str = "AUTH_JWT_SECRET_FILE";
const COOKIE_SECURE_ENV: &str = "AUTH_COOKIE_SECURE";
const USERS_ENV: &str = "AUTH_USERS";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const USERS_EXPECTED: &str = "user:password[,user:password...]";
const DEV_USERNAME: &str = "admin";
const DEV_PASSWORD: &str = "password";

/// Build mode for authentication configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use atelier::inbound::http::auth_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Authentication settings derived from the environment.
pub struct AuthSettings {
    /// HS256 signing secret; wiped on drop.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// Whether the `access_token` cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// Accounts allowed to log in.
    pub users: Vec<StaticUser>,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("users", &self.users.len())
            .finish()
    }
}

/// Errors raised while validating authentication configuration.
#[derive(thiserror::Error, Debug)]
pub enum AuthConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        expected: &'static str,
    },
    /// Reading the JWT secret file failed.
    #[error("failed to read JWT secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file exists but is too short for release builds.
    #[error("JWT secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Build authentication settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use atelier::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let secret_path = std::env::temp_dir().join("jwt_secret_example");
/// std::fs::write(&secret_path, vec![b'k'; 32])?;
///
/// let secret_path = secret_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "AUTH_JWT_SECRET_FILE" => Some(secret_path.clone()),
///     "AUTH_COOKIE_SECURE" => Some("1".to_string()),
///     "AUTH_USERS" => Some("ana:segredo".to_string()),
///     _ => None,
/// });
///
/// let settings = auth_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.users.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn auth_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AuthSettings, AuthConfigError> {
    let cookie_secure = cookie_secure_from_env(env, mode)?;
    let users = users_from_env(env, mode)?;
    let jwt_secret = jwt_secret_from_env(env, mode)?;

    Ok(AuthSettings {
        jwt_secret,
        cookie_secure,
        users,
    })
}

/// Fall back to `fallback` in debug builds, fail in release builds.
fn debug_default_or<T>(
    mode: BuildMode,
    fallback: T,
    error: AuthConfigError,
    warn_fn: impl FnOnce(),
) -> Result<T, AuthConfigError> {
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, AuthConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => debug_default_or(
                mode,
                true,
                AuthConfigError::InvalidEnv {
                    name: COOKIE_SECURE_ENV,
                    expected: BOOL_EXPECTED,
                },
                || warn!(value = %value, "invalid AUTH_COOKIE_SECURE; defaulting to secure"),
            ),
        },
        None => debug_default_or(
            mode,
            true,
            AuthConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV,
            },
            || warn!("AUTH_COOKIE_SECURE not set; defaulting to secure"),
        ),
    }
}

fn users_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Vec<StaticUser>, AuthConfigError> {
    let Some(mut raw) = env.string(USERS_ENV) else {
        return debug_default_or(
            mode,
            vec![StaticUser::new(DEV_USERNAME, DEV_PASSWORD)],
            AuthConfigError::MissingEnv { name: USERS_ENV },
            || warn!("AUTH_USERS not set; using the development account (dev only)"),
        );
    };
    let users = parse_users(&raw);
    raw.zeroize();
    // Malformed lists are rejected in every build mode.
    users.ok_or(AuthConfigError::InvalidEnv {
        name: USERS_ENV,
        expected: USERS_EXPECTED,
    })
}

fn jwt_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, AuthConfigError> {
    let path = PathBuf::from(
        env.string(JWT_SECRET_FILE_ENV)
            .unwrap_or_else(|| JWT_SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < JWT_SECRET_MIN_LEN {
                bytes.zeroize();
                return Err(AuthConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: JWT_SECRET_MIN_LEN,
                });
            }
            Ok(Zeroizing::new(bytes))
        }
        Err(error) => {
            let warn_path = path.clone();
            let warn_error = error.to_string();
            debug_default_or(
                mode,
                ephemeral_secret(),
                AuthConfigError::SecretRead {
                    path,
                    source: error,
                },
                || {
                    warn!(
                        path = %warn_path.display(),
                        error = %warn_error,
                        "using temporary JWT secret (dev only)"
                    );
                },
            )
        }
    }
}

/// Random secret valid for this process only; tokens die with it.
fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Vec::with_capacity(JWT_SECRET_MIN_LEN);
    while secret.len() < JWT_SECRET_MIN_LEN {
        secret.extend_from_slice(Uuid::new_v4().as_bytes());
    }
    Zeroizing::new(secret)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parse `user:password` pairs separated by commas.
///
/// Passwords may contain `:`; only the first colon separates the pair.
fn parse_users(raw: &str) -> Option<Vec<StaticUser>> {
    let users = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (username, password) = entry.split_once(':')?;
            let username = username.trim();
            (!username.is_empty() && !password.is_empty())
                .then(|| StaticUser::new(username, password))
        })
        .collect::<Option<Vec<_>>>()?;
    (!users.is_empty()).then_some(users)
}
