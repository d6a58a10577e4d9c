//! Driving port for calendar use-cases.
//!
//! Every mutation takes the acting user so implementations can consult the
//! mutation gate before touching storage. Denial surfaces as `Forbidden`,
//! not as a missing resource.

use async_trait::async_trait;

use crate::domain::{Actor, CalendarEvent, Error, EventEdit, EventId, EventPatch, UserId};

/// Domain use-case port for personal calendars.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Events on one user's calendar, earliest start first.
    async fn events_for(&self, user: &UserId) -> Result<Vec<CalendarEvent>, Error>;

    /// Fetch an event, failing with `NotFound` when it does not exist.
    async fn get_event(&self, id: EventId) -> Result<CalendarEvent, Error>;

    /// Apply a partial patch to an event the actor may mutate.
    async fn patch(
        &self,
        actor: &Actor,
        id: EventId,
        patch: EventPatch,
    ) -> Result<(), Error>;

    /// Apply a full edit to the event named by the form.
    ///
    /// A form without an event id fails with `Forbidden`; an id that
    /// matches no event fails with `NotFound`.
    async fn edit_event(&self, actor: &Actor, edit: EventEdit) -> Result<EventId, Error>;

    /// Remove an event the actor may mutate.
    async fn delete_event(&self, actor: &Actor, id: EventId) -> Result<(), Error>;
}

/// Fixture service over an empty calendar store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCalendarService;

#[async_trait]
impl CalendarService for FixtureCalendarService {
    async fn events_for(&self, _user: &UserId) -> Result<Vec<CalendarEvent>, Error> {
        Ok(Vec::new())
    }

    async fn get_event(&self, id: EventId) -> Result<CalendarEvent, Error> {
        Err(Error::not_found(format!("calendar event {id} not found")))
    }

    async fn patch(
        &self,
        _actor: &Actor,
        id: EventId,
        _patch: EventPatch,
    ) -> Result<(), Error> {
        Err(Error::not_found(format!("calendar event {id} not found")))
    }

    async fn edit_event(&self, _actor: &Actor, edit: EventEdit) -> Result<EventId, Error> {
        match edit.id {
            Some(id) => Err(Error::not_found(format!("calendar event {id} not found"))),
            None => Err(Error::forbidden("event form carried no event id")),
        }
    }

    async fn delete_event(&self, _actor: &Actor, id: EventId) -> Result<(), Error> {
        Err(Error::not_found(format!("calendar event {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, Role};

    fn actor() -> Actor {
        Actor::new(UserId::random(), Role::Editor)
    }

    #[tokio::test]
    async fn fixture_service_denies_idless_edits() {
        let service = FixtureCalendarService;
        let err = service
            .edit_event(&actor(), EventEdit::default())
            .await
            .expect_err("no id");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn fixture_service_reports_every_event_missing() {
        let service = FixtureCalendarService;
        let err = service
            .get_event(EventId::new(4))
            .await
            .expect_err("empty store");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
