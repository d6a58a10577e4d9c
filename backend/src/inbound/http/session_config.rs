//! Environment-driven session settings.
//!
//! Session cookies are configured through `CREWDECK_SESSION_*` variables.
//! Release builds must spell every toggle out and fail fast on anything
//! missing or unparseable; debug builds log a warning and substitute a
//! workable default so a fresh checkout runs without ceremony.

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/crewdeck/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "CREWDECK_SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "CREWDECK_SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "CREWDECK_SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "CREWDECK_SESSION_KEY_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Strictness applied when resolving session toggles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Warn and substitute defaults for missing or invalid toggles.
    Debug,
    /// Reject anything missing or unparseable.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::session_config::BuildMode;
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

/// Resolved cookie-session settings handed to the server wiring.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` policy for the session cookie.
    pub same_site: SameSite,
}

/// Why session settings could not be resolved.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A toggle a release build requires is absent.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// The absent variable.
        name: &'static str,
    },
    /// A toggle is set to something unparseable.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// The offending variable.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file is shorter than a release build tolerates.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Path that was read.
        path: PathBuf,
        /// Key length found, in bytes.
        length: usize,
        /// Required minimum, in bytes.
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("CREWDECK_SESSION_SAMESITE=None requires CREWDECK_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("CREWDECK_SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Resolve session settings from the environment under the given strictness.
///
/// # Examples
///
/// A debug build tolerates an empty environment and falls back to a secure
/// cookie, `SameSite=Lax`, and a generated throwaway key:
///
/// ```rust
/// use backend::inbound::http::session_config::{
///     session_settings_from_env, BuildMode, SessionConfigError,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug)?;
/// assert!(settings.cookie_secure);
/// # Ok::<(), SessionConfigError>(())
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let env = SessionEnv { env, mode };
    let cookie_secure = env.cookie_secure()?;
    let same_site = env.same_site(cookie_secure)?;
    let allow_ephemeral = env.allow_ephemeral()?;
    let key = env.signing_key(allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Environment view applying the build mode's leniency to each toggle.
struct SessionEnv<'e, E: Env> {
    env: &'e E,
    mode: BuildMode,
}

impl<E: Env> SessionEnv<'_, E> {
    fn raw(&self, name: &'static str) -> Result<String, SessionConfigError> {
        self.env
            .string(name)
            .ok_or(SessionConfigError::MissingEnv { name })
    }

    /// Debug builds downgrade a configuration error to a warning and a
    /// default; release builds keep the error.
    fn or_default<T>(
        &self,
        parsed: Result<T, SessionConfigError>,
        default: T,
    ) -> Result<T, SessionConfigError> {
        match parsed {
            Err(error) if self.mode.is_debug() => {
                warn!(%error, "session toggle unusable; applying the debug default");
                Ok(default)
            }
            other => other,
        }
    }

    fn flag(&self, name: &'static str) -> Result<bool, SessionConfigError> {
        let value = self.raw(name)?;
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Ok(true),
            "0" | "false" | "no" | "n" => Ok(false),
            _ => Err(SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            }),
        }
    }

    fn cookie_secure(&self) -> Result<bool, SessionConfigError> {
        self.or_default(self.flag(COOKIE_SECURE_ENV), true)
    }

    fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let parsed = self.raw(SAMESITE_ENV).and_then(|value| {
            match value.to_ascii_lowercase().as_str() {
                "lax" => Ok(SameSite::Lax),
                "strict" => Ok(SameSite::Strict),
                "none" => Ok(SameSite::None),
                _ => Err(SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                }),
            }
        });
        let policy = self.or_default(parsed, SameSite::Lax)?;
        if policy == SameSite::None && !cookie_secure {
            if !self.mode.is_debug() {
                return Err(SessionConfigError::InsecureSameSiteNone);
            }
            warn!("SameSite=None without a Secure cookie; browsers may reject it");
        }
        Ok(policy)
    }

    fn allow_ephemeral(&self) -> Result<bool, SessionConfigError> {
        let allowed = self.or_default(self.flag(ALLOW_EPHEMERAL_ENV), false)?;
        if allowed && !self.mode.is_debug() {
            return Err(SessionConfigError::EphemeralNotAllowed);
        }
        Ok(allowed)
    }

    fn signing_key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_string()),
        );
        match std::fs::read(&path) {
            Ok(bytes) => self.derive_key(path, bytes),
            Err(error) if self.mode.is_debug() || allow_ephemeral => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "session key unreadable; generating a throwaway key (dev only)"
                );
                Ok(Key::generate())
            }
            Err(source) => Err(SessionConfigError::KeyRead { path, source }),
        }
    }

    fn derive_key(&self, path: PathBuf, mut bytes: Vec<u8>) -> Result<Key, SessionConfigError> {
        let length = bytes.len();
        if !self.mode.is_debug() && length < SESSION_KEY_MIN_LEN {
            bytes.zeroize();
            return Err(SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: SESSION_KEY_MIN_LEN,
            });
        }
        let key = Key::derive_from(&bytes);
        bytes.zeroize();
        Ok(key)
    }
}

#[cfg(test)]
mod tests;
