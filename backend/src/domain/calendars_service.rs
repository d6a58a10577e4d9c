//! Calendar domain services.
//!
//! Every mutation runs the same sequence: load the event, consult the
//! mutation gate, validate, then write. Loading first keeps "it does not
//! exist" and "you may not touch it" distinguishable in responses.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::authorization::MutationGate;
use crate::domain::ports::{
    CalendarRepository, CalendarRepositoryError, CalendarService, OwnershipLookup,
};
use crate::domain::{
    Actor, CalendarEvent, Error, EventEdit, EventId, EventPatch, UserId,
};

fn map_repository_error(error: CalendarRepositoryError) -> Error {
    match error {
        CalendarRepositoryError::Connection { message } => {
            Error::internal(format!("calendar repository unavailable: {message}"))
        }
        CalendarRepositoryError::Query { message } => {
            Error::internal(format!("calendar repository error: {message}"))
        }
        CalendarRepositoryError::Missing { id } => {
            Error::not_found(format!("calendar event {id} not found"))
        }
    }
}

/// Calendar service enforcing ownership on every mutation.
pub struct GatedCalendarService<R, L> {
    events: Arc<R>,
    gate: MutationGate<EventId, L>,
}

impl<R, L> GatedCalendarService<R, L> {
    /// Create a new service over the event repository and ownership lookup.
    pub fn new(events: Arc<R>, lookup: Arc<L>) -> Self {
        Self {
            events,
            gate: MutationGate::new(lookup),
        }
    }
}

impl<R, L> GatedCalendarService<R, L>
where
    R: CalendarRepository,
    L: OwnershipLookup<EventId>,
{
    async fn fetch(&self, id: EventId) -> Result<CalendarEvent, Error> {
        self.events
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("calendar event {id} not found")))
    }

    async fn authorize(&self, actor: &Actor, id: EventId) -> Result<(), Error> {
        if self.gate.can_mutate(actor, id).await? {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "not allowed to change calendar event {id}"
            )))
        }
    }
}

#[async_trait]
impl<R, L> CalendarService for GatedCalendarService<R, L>
where
    R: CalendarRepository,
    L: OwnershipLookup<EventId>,
{
    async fn events_for(&self, user: &UserId) -> Result<Vec<CalendarEvent>, Error> {
        self.events
            .list_for_user(user)
            .await
            .map_err(map_repository_error)
    }

    async fn get_event(&self, id: EventId) -> Result<CalendarEvent, Error> {
        self.fetch(id).await
    }

    async fn patch(
        &self,
        actor: &Actor,
        id: EventId,
        patch: EventPatch,
    ) -> Result<(), Error> {
        let mut event = self.fetch(id).await?;
        self.authorize(actor, id).await?;
        event
            .patch(&patch)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.events
            .save(&event)
            .await
            .map_err(map_repository_error)
    }

    async fn edit_event(&self, actor: &Actor, edit: EventEdit) -> Result<EventId, Error> {
        let id = edit
            .id
            .ok_or_else(|| Error::forbidden("event form carried no event id"))?;
        let mut event = self.fetch(id).await?;
        self.authorize(actor, id).await?;
        event
            .apply(&edit)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.events
            .save(&event)
            .await
            .map_err(map_repository_error)?;
        Ok(id)
    }

    async fn delete_event(&self, actor: &Actor, id: EventId) -> Result<(), Error> {
        self.fetch(id).await?;
        self.authorize(actor, id).await?;
        self.events
            .delete(id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "calendars_service_tests.rs"]
mod tests;
