//! Ticket domain services.
//!
//! Implements the ticket driving port over the ticket repository. Updates
//! go through the aggregate's own validation so invalid patches never
//! reach storage.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{TicketRepository, TicketRepositoryError, TicketService};
use crate::domain::{
    Error, ProjectId, SubtaskForm, Ticket, TicketId, TicketType, TicketUpdate, descendants_of,
};

fn map_repository_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => {
            Error::internal(format!("ticket repository unavailable: {message}"))
        }
        TicketRepositoryError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
        TicketRepositoryError::Missing { id } => Error::not_found(format!("ticket {id} not found")),
    }
}

/// Repository-backed ticket service.
pub struct RepositoryTicketService<R> {
    tickets: Arc<R>,
}

impl<R> RepositoryTicketService<R> {
    /// Create a new service over the ticket repository.
    pub fn new(tickets: Arc<R>) -> Self {
        Self { tickets }
    }
}

impl<R> RepositoryTicketService<R>
where
    R: TicketRepository,
{
    async fn fetch(&self, id: TicketId) -> Result<Ticket, Error> {
        self.tickets
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ticket {id} not found")))
    }
}

#[async_trait]
impl<R> TicketService for RepositoryTicketService<R>
where
    R: TicketRepository,
{
    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, Error> {
        self.fetch(id).await
    }

    async fn update_ticket(&self, id: TicketId, update: TicketUpdate) -> Result<Ticket, Error> {
        let mut ticket = self.fetch(id).await?;
        ticket
            .apply(&update)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.tickets
            .save(&ticket)
            .await
            .map_err(map_repository_error)?;
        Ok(ticket)
    }

    async fn delete(&self, id: TicketId) -> Result<(), Error> {
        self.tickets.delete(id).await.map_err(map_repository_error)
    }

    async fn upsert_subtask(
        &self,
        project: ProjectId,
        parent: TicketId,
        form: SubtaskForm,
    ) -> Result<Ticket, Error> {
        match form.id {
            Some(id) => {
                let update = TicketUpdate {
                    headline: Some(form.headline),
                    description: Some(form.description),
                    status: Some(form.status),
                    ..TicketUpdate::default()
                };
                self.update_ticket(id, update).await
            }
            None => self
                .tickets
                .insert_subtask(project, parent, form)
                .await
                .map_err(map_repository_error),
        }
    }

    async fn subtasks_of(&self, parent: TicketId) -> Result<Vec<Ticket>, Error> {
        self.tickets
            .children_of(parent)
            .await
            .map_err(map_repository_error)
    }

    async fn possible_parents(
        &self,
        project: ProjectId,
        ticket: TicketId,
    ) -> Result<Vec<Ticket>, Error> {
        let all = self
            .tickets
            .list_for_project(project)
            .await
            .map_err(map_repository_error)?;
        let below = descendants_of(&all, ticket);
        Ok(all
            .into_iter()
            .filter(|candidate| candidate.id() != ticket && !below.contains(&candidate.id()))
            .collect())
    }

    async fn milestones_for(&self, project: ProjectId) -> Result<Vec<Ticket>, Error> {
        let all = self
            .tickets
            .list_for_project(project)
            .await
            .map_err(map_repository_error)?;
        Ok(all
            .into_iter()
            .filter(|candidate| candidate.ticket_type() == TicketType::Milestone)
            .collect())
    }
}

#[cfg(test)]
#[path = "tickets_service_tests.rs"]
mod tests;
