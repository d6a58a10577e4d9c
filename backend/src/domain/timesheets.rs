//! Logged working hours against tickets.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tickets::TicketId;
use super::users::UserId;

/// Stable timesheet entry identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimesheetId(u64);

impl TimesheetId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimesheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of logged work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourKind {
    General,
    Development,
    Bugfixing,
    Testing,
    ProjectManagement,
    Administration,
}

impl HourKind {
    /// Every kind a user can pick when logging time.
    pub const LOGGABLE: [HourKind; 6] = [
        Self::General,
        Self::Development,
        Self::Bugfixing,
        Self::Testing,
        Self::ProjectManagement,
        Self::Administration,
    ];

    /// Stable identifier used in forms and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Development => "development",
            Self::Bugfixing => "bugfixing",
            Self::Testing => "testing",
            Self::ProjectManagement => "project_management",
            Self::Administration => "administration",
        }
    }

    /// Human-readable label used in rendered fragments.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Development => "Development",
            Self::Bugfixing => "Bugfixing",
            Self::Testing => "Testing",
            Self::ProjectManagement => "Project management",
            Self::Administration => "Administration",
        }
    }
}

impl FromStr for HourKind {
    type Err = TimesheetValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LOGGABLE
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TimesheetValidationError::UnknownKind {
                kind: s.to_owned(),
            })
    }
}

/// Validation errors raised when logging time.
#[derive(Debug, Clone, PartialEq)]
pub enum TimesheetValidationError {
    UnknownKind { kind: String },
    InvalidHours { raw: String },
    NonPositiveHours { hours: f64 },
}

impl fmt::Display for TimesheetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind { kind } => write!(f, "unknown hour kind: {kind}"),
            Self::InvalidHours { raw } => write!(f, "hours value is not a number: {raw}"),
            Self::NonPositiveHours { hours } => {
                write!(f, "logged hours must be positive, got {hours}")
            }
        }
    }
}

impl std::error::Error for TimesheetValidationError {}

/// Parse an hours form value, accepting both `1.5` and `1,5`.
pub fn parse_hours(raw: &str) -> Result<f64, TimesheetValidationError> {
    let normalised = raw.trim().replace(',', ".");
    let hours: f64 = normalised
        .parse()
        .map_err(|_| TimesheetValidationError::InvalidHours {
            raw: raw.to_owned(),
        })?;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(TimesheetValidationError::NonPositiveHours { hours });
    }
    Ok(hours)
}

/// Hours a user logged against a ticket on a given date.
///
/// ## Invariants
/// - `hours` is finite and positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    id: TimesheetId,
    ticket_id: TicketId,
    user_id: UserId,
    kind: HourKind,
    date: NaiveDate,
    hours: f64,
    description: String,
}

impl TimesheetEntry {
    /// Fallible constructor enforcing the hours invariant.
    pub fn try_new(
        id: TimesheetId,
        ticket_id: TicketId,
        user_id: UserId,
        kind: HourKind,
        date: NaiveDate,
        hours: f64,
        description: impl Into<String>,
    ) -> Result<Self, TimesheetValidationError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(TimesheetValidationError::NonPositiveHours { hours });
        }
        Ok(Self {
            id,
            ticket_id,
            user_id,
            kind,
            date,
            hours,
            description: description.into(),
        })
    }

    /// Stable entry identifier.
    pub fn id(&self) -> TimesheetId {
        self.id
    }

    /// Ticket the hours were logged against.
    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// User who logged the hours.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Category of the logged work.
    pub fn kind(&self) -> HourKind {
        self.kind
    }

    /// Date the work happened.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Number of hours worked.
    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Free-form note describing the work.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.5", Ok(1.5))]
    #[case("2,25", Ok(2.25))]
    #[case(" 8 ", Ok(8.0))]
    #[case("abc", Err(()))]
    #[case("0", Err(()))]
    #[case("-3", Err(()))]
    fn hours_parsing(#[case] raw: &str, #[case] expected: Result<f64, ()>) {
        let result = parse_hours(raw).map_err(|_| ());
        match (result, expected) {
            (Ok(actual), Ok(wanted)) => assert!((actual - wanted).abs() < f64::EPSILON),
            (Err(()), Err(())) => {}
            (actual, wanted) => panic!("parse_hours({raw:?}) = {actual:?}, wanted {wanted:?}"),
        }
    }

    #[rstest]
    fn kind_parses_stable_identifiers() {
        assert_eq!(
            "project_management".parse::<HourKind>(),
            Ok(HourKind::ProjectManagement)
        );
        assert!(matches!(
            "punch".parse::<HourKind>(),
            Err(TimesheetValidationError::UnknownKind { .. })
        ));
    }

    #[rstest]
    fn entries_reject_non_positive_hours() {
        let result = TimesheetEntry::try_new(
            TimesheetId::new(1),
            TicketId::new(7),
            UserId::random(),
            HourKind::Development,
            NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
            0.0,
            "",
        );
        assert!(matches!(
            result,
            Err(TimesheetValidationError::NonPositiveHours { .. })
        ));
    }
}
