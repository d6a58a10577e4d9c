//! Driving port for user profile queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible
//! profile data without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Role, User, UserId};

/// Domain use-case port for user profile lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user's profile, failing with `NotFound` for unknown ids.
    async fn user(&self, id: &UserId) -> Result<User, Error>;
}

/// Fixture query that answers every lookup with the same profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn user(&self, id: &UserId) -> Result<User, Error> {
        // These values are compile-time constants; surface invalid data as an
        // internal error so automated checks catch accidental regressions.
        User::try_from_strings(*id, "ada", "Ada Lovelace", Role::Admin)
            .map_err(|err| Error::internal(format!("invalid fixture user: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_users_query_returns_expected_user() {
        let query = FixtureUsersQuery;
        let user_id = UserId::new("11111111-1111-1111-1111-111111111111").expect("fixture user id");

        let user = query.user(&user_id).await.expect("user profile");
        assert_eq!(user.display_name().as_ref(), "Ada Lovelace");
        assert_eq!(user.id(), &user_id);
    }
}
