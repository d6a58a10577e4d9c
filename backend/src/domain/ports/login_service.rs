//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Actor, Error, LoginCredentials, Role, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated actor.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error>;
}

/// In-memory authenticator for development and handler tests.
///
/// `admin` / `password` authenticates as an administrator with a fixed
/// user id; everything else is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error> {
        if credentials.username() == "admin" && credentials.password() == "password" {
            let id = UserId::new("123e4567-e89b-12d3-a456-426614174000")
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
            Ok(Actor::new(id, Role::Admin))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
