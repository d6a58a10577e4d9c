//! Port for user account lookup.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// A user account together with its stored credential.
///
/// The password never crosses this boundary in the clear; the directory
/// stores a lowercase hex SHA-256 digest and authentication compares
/// digests.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub user: User,
    pub password_sha256: String,
}

/// Port for account and credential lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user account by identifier.
    async fn find(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError>;

    /// Fetch the credential record for a username.
    ///
    /// Returns `None` for unknown usernames so login failures cannot
    /// distinguish a missing account from a wrong password.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, UserDirectoryError>;
}

/// Fixture directory with no accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find(&self, _id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(None)
    }

    async fn find_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<CredentialRecord>, UserDirectoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_directory_has_no_accounts() {
        let directory = FixtureUserDirectory;
        let record = directory
            .find_by_username("erik")
            .await
            .expect("fixture lookup should succeed");
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn fixture_directory_finds_no_ids() {
        let directory = FixtureUserDirectory;
        let user = directory
            .find(&UserId::random())
            .await
            .expect("fixture lookup should succeed");
        assert!(user.is_none());
    }
}
