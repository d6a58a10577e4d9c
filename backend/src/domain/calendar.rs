//! Personal calendar events.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::users::UserId;

/// Stable calendar event identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for calendar events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarValidationError {
    EmptyDescription,
}

impl fmt::Display for CalendarValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "event description must not be empty"),
        }
    }
}

impl std::error::Error for CalendarValidationError {}

/// Combine optional date and time halves into a timestamp.
///
/// Returns `Some` only when both halves are present; a lone date or
/// lone time yields `None`.
pub fn combine_date_time(
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Option<NaiveDateTime> {
    match (date, time) {
        (Some(date), Some(time)) => Some(date.and_time(time)),
        _ => None,
    }
}

/// Interpret an HTML checkbox value.
pub fn checkbox_checked(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim),
        Some("on") | Some("true") | Some("1")
    )
}

/// A single event on a user's personal calendar.
///
/// ## Invariants
/// - `description` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    id: EventId,
    user_id: UserId,
    description: String,
    date_from: Option<NaiveDateTime>,
    date_to: Option<NaiveDateTime>,
    all_day: bool,
}

impl CalendarEvent {
    /// Fallible constructor enforcing the description invariant.
    pub fn try_new(
        id: EventId,
        user_id: UserId,
        description: impl Into<String>,
        date_from: Option<NaiveDateTime>,
        date_to: Option<NaiveDateTime>,
        all_day: bool,
    ) -> Result<Self, CalendarValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(CalendarValidationError::EmptyDescription);
        }
        Ok(Self {
            id,
            user_id,
            description,
            date_from,
            date_to,
            all_day,
        })
    }

    /// Stable event identifier.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Owner of the event.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// What the event is about.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Start timestamp, if scheduled.
    pub fn date_from(&self) -> Option<NaiveDateTime> {
        self.date_from
    }

    /// End timestamp, if scheduled.
    pub fn date_to(&self) -> Option<NaiveDateTime> {
        self.date_to
    }

    /// Whether the event spans whole days rather than clock times.
    pub fn all_day(&self) -> bool {
        self.all_day
    }

    /// Apply an edit, replacing every user-editable field.
    pub fn apply(&mut self, edit: &EventEdit) -> Result<(), CalendarValidationError> {
        if edit.description.trim().is_empty() {
            return Err(CalendarValidationError::EmptyDescription);
        }
        self.description = edit.description.clone();
        self.date_from = combine_date_time(edit.from_date, edit.from_time);
        self.date_to = combine_date_time(edit.to_date, edit.to_time);
        self.all_day = edit.all_day;
        Ok(())
    }

    /// Apply a partial patch, leaving `None` fields untouched.
    pub fn patch(&mut self, patch: &EventPatch) -> Result<(), CalendarValidationError> {
        if let Some(description) = &patch.description {
            if description.trim().is_empty() {
                return Err(CalendarValidationError::EmptyDescription);
            }
            self.description = description.clone();
        }
        if let Some(date_from) = patch.date_from {
            self.date_from = date_from;
        }
        if let Some(date_to) = patch.date_to {
            self.date_to = date_to;
        }
        if let Some(all_day) = patch.all_day {
            self.all_day = all_day;
        }
        Ok(())
    }
}

/// Edit form submitted from the calendar panel.
///
/// Date and time arrive as separate form fields; either half may be
/// missing independently. The target event id travels with the form and
/// may be absent when the form was tampered with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventEdit {
    pub id: Option<EventId>,
    pub description: String,
    pub from_date: Option<NaiveDate>,
    pub from_time: Option<NaiveTime>,
    pub to_date: Option<NaiveDate>,
    pub to_time: Option<NaiveTime>,
    pub all_day: bool,
}

/// Partial update of an event's editable fields.
///
/// `None` leaves a field unchanged. The timestamp fields use a nested
/// `Option` so a patch can clear them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventPatch {
    pub description: Option<String>,
    pub date_from: Option<Option<NaiveDateTime>>,
    pub date_to: Option<Option<NaiveDateTime>>,
    pub all_day: Option<bool>,
}
