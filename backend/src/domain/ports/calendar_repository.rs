//! Port for calendar event persistence.

use async_trait::async_trait;

use crate::domain::{CalendarEvent, EventId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by calendar repository adapters.
    pub enum CalendarRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "calendar repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "calendar repository query failed: {message}",
        /// No event with the given identifier exists.
        Missing { id: u64 } =>
            "calendar event {id} not found",
    }
}

/// Port for calendar event storage and retrieval.
///
/// Events belong to exactly one user. Adapters also answer ownership
/// lookups for the mutation gate, which is a separate port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Events on one user's calendar, earliest start first.
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<CalendarEvent>, CalendarRepositoryError>;

    /// Fetch an event by identifier.
    async fn find(&self, id: EventId) -> Result<Option<CalendarEvent>, CalendarRepositoryError>;

    /// Store a new event and allocate its identifier.
    ///
    /// The identifier on the way in is ignored; the returned event carries
    /// the allocated one.
    async fn insert(
        &self,
        event: CalendarEvent,
    ) -> Result<CalendarEvent, CalendarRepositoryError>;

    /// Persist changes to an existing event.
    ///
    /// Fails with [`CalendarRepositoryError::Missing`] when the event was
    /// never inserted.
    async fn save(&self, event: &CalendarEvent) -> Result<(), CalendarRepositoryError>;

    /// Remove an event.
    async fn delete(&self, id: EventId) -> Result<(), CalendarRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCalendarRepository;

#[async_trait]
impl CalendarRepository for FixtureCalendarRepository {
    async fn list_for_user(
        &self,
        _user: &UserId,
    ) -> Result<Vec<CalendarEvent>, CalendarRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _id: EventId,
    ) -> Result<Option<CalendarEvent>, CalendarRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        event: CalendarEvent,
    ) -> Result<CalendarEvent, CalendarRepositoryError> {
        Ok(event)
    }

    async fn save(&self, _event: &CalendarEvent) -> Result<(), CalendarRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: EventId) -> Result<(), CalendarRepositoryError> {
        Ok(())
    }
}
