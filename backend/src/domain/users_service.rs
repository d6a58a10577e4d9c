//! User directory domain services.
//!
//! Implements authentication and profile lookup over the user directory
//! port. Unknown usernames and wrong passwords produce the same error so
//! responses cannot be used to probe for accounts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{LoginService, UserDirectory, UserDirectoryError, UsersQuery};
use crate::domain::{Actor, Error, LoginCredentials, User, UserId, password_digest};

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::internal(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

/// Authentication and profile service over the user directory.
pub struct DirectoryUsersService<U> {
    directory: Arc<U>,
}

impl<U> DirectoryUsersService<U> {
    /// Create a new service over the user directory.
    pub fn new(directory: Arc<U>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<U> LoginService for DirectoryUsersService<U>
where
    U: UserDirectory,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error> {
        let record = self
            .directory
            .find_by_username(credentials.username())
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        if record.password_sha256 != password_digest(credentials.password()) {
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(Actor::new(*record.user.id(), record.user.role()))
    }
}

#[async_trait]
impl<U> UsersQuery for DirectoryUsersService<U>
where
    U: UserDirectory,
{
    async fn user(&self, id: &UserId) -> Result<User, Error> {
        self.directory
            .find(id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}
