//! Driving port for timesheet use-cases.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Error, HourKind, Ticket, TicketId, TimesheetEntry, TimesheetId, UserId};

/// Request to log hours against a ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeLog {
    pub ticket: TicketId,
    pub user: UserId,
    pub kind: HourKind,
    /// Date the work happened; `None` logs against today.
    pub date: Option<NaiveDate>,
    pub hours: f64,
    pub description: String,
}

/// Domain use-case port for logged hours.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimesheetService: Send + Sync {
    /// Hour kinds a user can pick when logging time.
    fn loggable_hour_kinds(&self) -> &'static [HourKind];

    /// Hours logged against a ticket, summed per date.
    async fn hours_for_ticket_by_date(
        &self,
        ticket: TicketId,
    ) -> Result<BTreeMap<NaiveDate, f64>, Error>;

    /// Hours one user logged against a ticket.
    async fn user_hours_on_ticket(
        &self,
        ticket: TicketId,
        user: &UserId,
    ) -> Result<f64, Error>;

    /// Total hours logged against a ticket.
    async fn sum_hours_for_ticket(&self, ticket: TicketId) -> Result<f64, Error>;

    /// Planned hours minus logged hours, floored at zero.
    async fn remaining_hours(&self, ticket: &Ticket) -> Result<f64, Error>;

    /// Log hours, rejecting non-positive values with `InvalidRequest`.
    async fn log_time(&self, log: TimeLog) -> Result<TimesheetEntry, Error>;

    /// Whether the user has an open punch clock session.
    async fn is_clocked(&self, user: &UserId) -> Result<bool, Error>;
}

/// Fixture service over an empty timesheet store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTimesheetService;

#[async_trait]
impl TimesheetService for FixtureTimesheetService {
    fn loggable_hour_kinds(&self) -> &'static [HourKind] {
        &HourKind::LOGGABLE
    }

    async fn hours_for_ticket_by_date(
        &self,
        _ticket: TicketId,
    ) -> Result<BTreeMap<NaiveDate, f64>, Error> {
        Ok(BTreeMap::new())
    }

    async fn user_hours_on_ticket(
        &self,
        _ticket: TicketId,
        _user: &UserId,
    ) -> Result<f64, Error> {
        Ok(0.0)
    }

    async fn sum_hours_for_ticket(&self, _ticket: TicketId) -> Result<f64, Error> {
        Ok(0.0)
    }

    async fn remaining_hours(&self, ticket: &Ticket) -> Result<f64, Error> {
        Ok(ticket.planned_hours())
    }

    async fn log_time(&self, log: TimeLog) -> Result<TimesheetEntry, Error> {
        let date = log.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        TimesheetEntry::try_new(
            TimesheetId::new(0),
            log.ticket,
            log.user,
            log.kind,
            date,
            log.hours,
            log.description,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn is_clocked(&self, _user: &UserId) -> Result<bool, Error> {
        Ok(false)
    }
}
