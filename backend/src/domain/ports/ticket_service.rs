//! Driving port for ticket use-cases.
//!
//! Inbound adapters call this port to read and mutate tickets without
//! knowing the backing storage. The ticket modal controller is the main
//! consumer.

use async_trait::async_trait;

use crate::domain::{Error, ProjectId, SubtaskForm, Ticket, TicketId, TicketUpdate};

/// Domain use-case port for tickets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketService: Send + Sync {
    /// Fetch a ticket, failing with `NotFound` when it does not exist.
    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, Error>;

    /// Apply a partial update to a ticket's editable fields.
    ///
    /// The project binding is preserved regardless of the update.
    async fn update_ticket(&self, id: TicketId, update: TicketUpdate) -> Result<Ticket, Error>;

    /// Remove a ticket; used for subtasks.
    async fn delete(&self, id: TicketId) -> Result<(), Error>;

    /// Create or update a subtask under `parent`.
    async fn upsert_subtask(
        &self,
        project: ProjectId,
        parent: TicketId,
        form: SubtaskForm,
    ) -> Result<Ticket, Error>;

    /// Direct children of a ticket.
    async fn subtasks_of(&self, parent: TicketId) -> Result<Vec<Ticket>, Error>;

    /// Tickets in the same project that could become the ticket's parent.
    ///
    /// Excludes the ticket itself and everything below it, so re-parenting
    /// can never create a cycle.
    async fn possible_parents(
        &self,
        project: ProjectId,
        ticket: TicketId,
    ) -> Result<Vec<Ticket>, Error>;

    /// Milestone tickets of a project, for the modal's milestone select.
    async fn milestones_for(&self, project: ProjectId) -> Result<Vec<Ticket>, Error>;
}

/// Fixture service over an empty ticket store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTicketService;

#[async_trait]
impl TicketService for FixtureTicketService {
    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, Error> {
        Err(Error::not_found(format!("ticket {id} not found")))
    }

    async fn update_ticket(&self, id: TicketId, _update: TicketUpdate) -> Result<Ticket, Error> {
        Err(Error::not_found(format!("ticket {id} not found")))
    }

    async fn delete(&self, id: TicketId) -> Result<(), Error> {
        Err(Error::not_found(format!("ticket {id} not found")))
    }

    async fn upsert_subtask(
        &self,
        _project: ProjectId,
        parent: TicketId,
        _form: SubtaskForm,
    ) -> Result<Ticket, Error> {
        Err(Error::not_found(format!("ticket {parent} not found")))
    }

    async fn subtasks_of(&self, _parent: TicketId) -> Result<Vec<Ticket>, Error> {
        Ok(Vec::new())
    }

    async fn possible_parents(
        &self,
        _project: ProjectId,
        _ticket: TicketId,
    ) -> Result<Vec<Ticket>, Error> {
        Ok(Vec::new())
    }

    async fn milestones_for(&self, _project: ProjectId) -> Result<Vec<Ticket>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_service_reports_every_ticket_missing() {
        let service = FixtureTicketService;
        let err = service
            .get_ticket(TicketId::new(7))
            .await
            .expect_err("empty store");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn fixture_service_has_no_subtasks() {
        let service = FixtureTicketService;
        let subtasks = service
            .subtasks_of(TicketId::new(7))
            .await
            .expect("listing succeeds");
        assert!(subtasks.is_empty());
    }
}
