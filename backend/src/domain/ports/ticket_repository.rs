//! Port for ticket persistence.
//!
//! Adapters implement this trait to provide durable storage for tickets,
//! including the parent links that make a ticket a subtask. Identifier
//! allocation for new subtasks is the adapter's responsibility.

use async_trait::async_trait;

use crate::domain::{ProjectId, SubtaskForm, Ticket, TicketId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ticket repository query failed: {message}",
        /// No ticket with the given identifier exists.
        Missing { id: u64 } =>
            "ticket {id} not found",
    }
}

/// Port for ticket storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Fetch a ticket by identifier.
    ///
    /// Returns `None` when no ticket with that identifier exists.
    async fn find(&self, id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Every ticket belonging to a project, subtasks included.
    async fn list_for_project(
        &self,
        project: ProjectId,
    ) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Direct children of a ticket.
    async fn children_of(&self, parent: TicketId) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Persist changes to an existing ticket.
    ///
    /// Fails with [`TicketRepositoryError::Missing`] when the ticket was
    /// never inserted.
    async fn save(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    /// Create a subtask under `parent` and allocate its identifier.
    async fn insert_subtask(
        &self,
        project: ProjectId,
        parent: TicketId,
        form: SubtaskForm,
    ) -> Result<Ticket, TicketRepositoryError>;

    /// Remove a ticket.
    async fn delete(&self, id: TicketId) -> Result<(), TicketRepositoryError>;
}

/// Fixture implementation for testing without a real database.
///
/// Lookups find nothing, listings are empty, and mutations succeed without
/// storing anything. Subtask creation builds the ticket it would have stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketRepository;

#[async_trait]
impl TicketRepository for FixtureTicketRepository {
    async fn find(&self, _id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(None)
    }

    async fn list_for_project(
        &self,
        _project: ProjectId,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn children_of(&self, _parent: TicketId) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(Vec::new())
    }

    async fn save(&self, _ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        Ok(())
    }

    async fn insert_subtask(
        &self,
        project: ProjectId,
        parent: TicketId,
        form: SubtaskForm,
    ) -> Result<Ticket, TicketRepositoryError> {
        use crate::domain::{Priority, TicketType};

        Ticket::try_new(
            TicketId::new(0),
            project,
            Some(parent),
            form.headline,
            form.description,
            form.status,
            TicketType::Task,
            Priority::Medium,
            None,
            0.0,
            None,
        )
        .map_err(|err| TicketRepositoryError::query(err.to_string()))
    }

    async fn delete(&self, _id: TicketId) -> Result<(), TicketRepositoryError> {
        Ok(())
    }
}
