//! Port for timesheet persistence.

use async_trait::async_trait;

use crate::domain::{TicketId, TimesheetEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by timesheet repository adapters.
    pub enum TimesheetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "timesheet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "timesheet repository query failed: {message}",
    }
}

/// Port for logged-hours storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimesheetRepository: Send + Sync {
    /// Every entry logged against a ticket, oldest date first.
    async fn entries_for_ticket(
        &self,
        ticket: TicketId,
    ) -> Result<Vec<TimesheetEntry>, TimesheetRepositoryError>;

    /// Store an entry and allocate its identifier.
    ///
    /// The identifier on the way in is ignored; the returned entry carries
    /// the allocated one.
    async fn insert(
        &self,
        entry: TimesheetEntry,
    ) -> Result<TimesheetEntry, TimesheetRepositoryError>;

    /// Whether the user has an open punch clock session.
    async fn has_open_punch(&self, user: &UserId) -> Result<bool, TimesheetRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTimesheetRepository;

#[async_trait]
impl TimesheetRepository for FixtureTimesheetRepository {
    async fn entries_for_ticket(
        &self,
        _ticket: TicketId,
    ) -> Result<Vec<TimesheetEntry>, TimesheetRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(
        &self,
        entry: TimesheetEntry,
    ) -> Result<TimesheetEntry, TimesheetRepositoryError> {
        Ok(entry)
    }

    async fn has_open_punch(&self, _user: &UserId) -> Result<bool, TimesheetRepositoryError> {
        Ok(false)
    }
}
