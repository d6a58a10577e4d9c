//! Authentication and authorisation primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::users::UserId;

/// Lowercase hex SHA-256 digest of a password.
///
/// The user directory stores digests in this form; authentication compares
/// digests rather than plain text.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Application-wide role granted to a user.
///
/// Roles are strictly ordered from least to most privileged; authorisation
/// checks compare against a threshold rather than enumerating roles.
///
/// # Examples
/// ```
/// use backend::domain::Role;
///
/// assert!(Role::Admin.is_at_least(Role::Editor));
/// assert!(!Role::Commenter.is_at_least(Role::Manager));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May view content only.
    Reader,
    /// May view and comment.
    Commenter,
    /// May create and edit their own content.
    Editor,
    /// May manage project membership and content.
    Manager,
    /// May act on any resource regardless of ownership.
    Admin,
    /// Instance owner; outranks every other role.
    Owner,
}

impl Role {
    /// Whether this role meets or exceeds `threshold`.
    pub fn is_at_least(self, threshold: Role) -> bool {
        self >= threshold
    }

    /// Human-readable label used in rendered fragments.
    pub fn label(self) -> &'static str {
        match self {
            Self::Reader => "Reader",
            Self::Commenter => "Commenter",
            Self::Editor => "Editor",
            Self::Manager => "Manager",
            Self::Admin => "Administrator",
            Self::Owner => "Owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The authenticated principal attached to a request.
///
/// Established at login and read-only for the rest of the request; role or
/// ownership changes take effect on the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    id: UserId,
    role: Role,
}

impl Actor {
    /// Build an actor from its identity and role.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Stable identifier of the authenticated user.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Role the user held when the session was established.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
