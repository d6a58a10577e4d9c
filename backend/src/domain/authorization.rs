//! Ownership-based gate for mutating operations.
//!
//! Calendar mutations may only be performed by the owner of the event or by
//! a sufficiently privileged role. The gate evaluates that rule against an
//! [`OwnershipLookup`] port; it never caches, so role or ownership changes
//! take effect on the next call.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::ports::{OwnershipLookup, OwnershipLookupError};
use crate::domain::{Actor, Error, Role};

fn map_lookup_error(error: OwnershipLookupError) -> Error {
    match error {
        OwnershipLookupError::Connection { message } => {
            Error::internal(format!("ownership lookup unavailable: {message}"))
        }
        OwnershipLookupError::Query { message } => {
            Error::internal(format!("ownership lookup error: {message}"))
        }
    }
}

/// Decides whether an actor may mutate a resource.
///
/// Roles at or above the admin threshold pass unconditionally and the
/// lookup is never consulted for them. Everyone else must own the
/// resource. A missing resource denies rather than errors; callers decide
/// whether denial or absence is the message to surface.
pub struct MutationGate<Id, L> {
    lookup: Arc<L>,
    admin_threshold: Role,
    _resource: PhantomData<fn(Id)>,
}

impl<Id, L> MutationGate<Id, L> {
    /// Gate with the default admin threshold of [`Role::Admin`].
    pub fn new(lookup: Arc<L>) -> Self {
        Self::with_threshold(lookup, Role::Admin)
    }

    /// Gate with a custom admin threshold.
    pub fn with_threshold(lookup: Arc<L>, admin_threshold: Role) -> Self {
        Self {
            lookup,
            admin_threshold,
            _resource: PhantomData,
        }
    }
}

impl<Id, L> MutationGate<Id, L>
where
    Id: Send + Sync + 'static,
    L: OwnershipLookup<Id>,
{
    /// Evaluate the mutation rule for one actor and one resource.
    ///
    /// `Err` is reserved for infrastructure faults from the lookup port;
    /// denial and absence both come back as `Ok(false)`.
    pub async fn can_mutate(&self, actor: &Actor, resource: Id) -> Result<bool, Error> {
        if actor.role().is_at_least(self.admin_threshold) {
            return Ok(true);
        }
        let owner = self
            .lookup
            .owner_of(resource)
            .await
            .map_err(map_lookup_error)?;
        Ok(owner.as_ref() == Some(actor.id()))
    }
}
