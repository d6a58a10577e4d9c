//! Port for resolving who owns a resource.
//!
//! Mutation gating needs exactly one fact from storage: which user, if any,
//! owns the resource being changed. Keeping that behind its own narrow port
//! lets the gate stay generic over resource id types and keeps authorization
//! tests free of full repository doubles.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by ownership lookup adapters.
    pub enum OwnershipLookupError {
        /// Backing store could not be reached.
        Connection { message: String } =>
            "ownership lookup connection failed: {message}",
        /// Lookup query failed during execution.
        Query { message: String } =>
            "ownership lookup query failed: {message}",
    }
}

/// Port answering "who owns this resource?".
///
/// Returns `Ok(None)` when the resource does not exist; absence is a fact,
/// not a failure, and the caller decides what it means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipLookup<Id: Send + Sync + 'static>: Send + Sync {
    /// Resolve the owning user of a resource, if the resource exists.
    async fn owner_of(&self, resource: Id) -> Result<Option<UserId>, OwnershipLookupError>;
}

/// Fixture lookup that owns nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOwnershipLookup;

#[async_trait]
impl<Id: Send + Sync + 'static> OwnershipLookup<Id> for FixtureOwnershipLookup {
    async fn owner_of(&self, _resource: Id) -> Result<Option<UserId>, OwnershipLookupError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::EventId;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_lookup_reports_no_owner() {
        let lookup = FixtureOwnershipLookup;
        let owner = <FixtureOwnershipLookup as OwnershipLookup<EventId>>::owner_of(
            &lookup,
            EventId::new(3),
        )
        .await
        .expect("fixture lookup should succeed");
        assert!(owner.is_none());
    }

    #[rstest]
    fn connection_error_formats_the_message() {
        let error = OwnershipLookupError::connection("socket closed");
        assert_eq!(
            error.to_string(),
            "ownership lookup connection failed: socket closed"
        );
    }
}
