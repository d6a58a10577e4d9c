//! Timesheet domain services.
//!
//! Totals are derived from the stored entries at call time. The clock is
//! injected so "log against today" stays deterministic under test.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;

use crate::domain::ports::{
    TimeLog, TimesheetRepository, TimesheetRepositoryError, TimesheetService,
};
use crate::domain::{Error, HourKind, Ticket, TicketId, TimesheetEntry, TimesheetId, UserId};

fn map_repository_error(error: TimesheetRepositoryError) -> Error {
    match error {
        TimesheetRepositoryError::Connection { message } => {
            Error::internal(format!("timesheet repository unavailable: {message}"))
        }
        TimesheetRepositoryError::Query { message } => {
            Error::internal(format!("timesheet repository error: {message}"))
        }
    }
}

/// Clock-aware timesheet service over the timesheet repository.
pub struct ClockedTimesheetService<R> {
    timesheets: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ClockedTimesheetService<R> {
    /// Create a new service over the timesheet repository.
    pub fn new(timesheets: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { timesheets, clock }
    }
}

impl<R> ClockedTimesheetService<R>
where
    R: TimesheetRepository,
{
    async fn entries(&self, ticket: TicketId) -> Result<Vec<TimesheetEntry>, Error> {
        self.timesheets
            .entries_for_ticket(ticket)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> TimesheetService for ClockedTimesheetService<R>
where
    R: TimesheetRepository,
{
    fn loggable_hour_kinds(&self) -> &'static [HourKind] {
        &HourKind::LOGGABLE
    }

    async fn hours_for_ticket_by_date(
        &self,
        ticket: TicketId,
    ) -> Result<BTreeMap<NaiveDate, f64>, Error> {
        let mut by_date = BTreeMap::new();
        for entry in self.entries(ticket).await? {
            *by_date.entry(entry.date()).or_insert(0.0) += entry.hours();
        }
        Ok(by_date)
    }

    async fn user_hours_on_ticket(
        &self,
        ticket: TicketId,
        user: &UserId,
    ) -> Result<f64, Error> {
        let total = self
            .entries(ticket)
            .await?
            .iter()
            .filter(|entry| entry.user_id() == user)
            .map(TimesheetEntry::hours)
            .sum();
        Ok(total)
    }

    async fn sum_hours_for_ticket(&self, ticket: TicketId) -> Result<f64, Error> {
        let total = self
            .entries(ticket)
            .await?
            .iter()
            .map(TimesheetEntry::hours)
            .sum();
        Ok(total)
    }

    async fn remaining_hours(&self, ticket: &Ticket) -> Result<f64, Error> {
        let logged = self.sum_hours_for_ticket(ticket.id()).await?;
        Ok((ticket.planned_hours() - logged).max(0.0))
    }

    async fn log_time(&self, log: TimeLog) -> Result<TimesheetEntry, Error> {
        let date = log
            .date
            .unwrap_or_else(|| self.clock.utc().date_naive());
        let entry = TimesheetEntry::try_new(
            TimesheetId::new(0),
            log.ticket,
            log.user,
            log.kind,
            date,
            log.hours,
            log.description,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.timesheets
            .insert(entry)
            .await
            .map_err(map_repository_error)
    }

    async fn is_clocked(&self, user: &UserId) -> Result<bool, Error> {
        self.timesheets
            .has_open_punch(user)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "timesheets_service_tests.rs"]
mod tests;
