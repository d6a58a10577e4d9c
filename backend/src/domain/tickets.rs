//! Ticket aggregate and its label catalogues.
//!
//! Tickets carry work items inside a project. A subtask is an ordinary ticket
//! whose `parent` points at another ticket in the same project.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::projects::ProjectId;

/// Stable ticket identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    InProgress,
    Blocked,
    Waiting,
    Done,
}

impl TicketStatus {
    /// Every status in workflow order, for select inputs.
    pub const ALL: [TicketStatus; 5] = [
        Self::New,
        Self::InProgress,
        Self::Blocked,
        Self::Waiting,
        Self::Done,
    ];

    /// Stable identifier used in forms and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Waiting => "waiting",
            Self::Done => "done",
        }
    }

    /// Human-readable label used in rendered fragments.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In progress",
            Self::Blocked => "Blocked",
            Self::Waiting => "Waiting",
            Self::Done => "Done",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TicketValidationError::UnknownStatus {
                status: s.to_owned(),
            })
    }
}

/// Kind of work a ticket represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Task,
    Story,
    Bug,
    Milestone,
}

impl TicketType {
    /// Every ticket type, for select inputs.
    pub const ALL: [TicketType; 4] = [Self::Task, Self::Story, Self::Bug, Self::Milestone];

    /// Stable identifier used in forms and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Story => "story",
            Self::Bug => "bug",
            Self::Milestone => "milestone",
        }
    }

    /// Human-readable label used in rendered fragments.
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Story => "Story",
            Self::Bug => "Bug",
            Self::Milestone => "Milestone",
        }
    }

    /// Icon class rendered next to the type label.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Task => "fa-check-square",
            Self::Story => "fa-book",
            Self::Bug => "fa-bug",
            Self::Milestone => "fa-flag",
        }
    }
}

impl FromStr for TicketType {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TicketValidationError::UnknownType {
                ticket_type: s.to_owned(),
            })
    }
}

/// Urgency of a ticket, ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Lowest,
}

impl Priority {
    /// Every priority in descending urgency, for select inputs.
    pub const ALL: [Priority; 5] = [
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Lowest,
    ];

    /// Numeric key used in forms and storage; lower is more urgent.
    pub fn key(self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
            Self::Lowest => 5,
        }
    }

    /// Look up a priority by its numeric key.
    pub fn from_key(key: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| priority.key() == key)
    }

    /// Human-readable label used in rendered fragments.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Lowest => "Lowest",
        }
    }
}

/// Effort scale: story-point key to t-shirt size label.
pub const EFFORT_LABELS: &[(u8, &str)] = &[
    (1, "XS"),
    (2, "S"),
    (3, "M"),
    (5, "L"),
    (8, "XL"),
    (13, "XXL"),
];

/// Label for an effort key, if the key is on the scale.
pub fn effort_label(points: u8) -> Option<&'static str> {
    EFFORT_LABELS
        .iter()
        .find(|(key, _)| *key == points)
        .map(|(_, label)| *label)
}

/// Validation errors raised by ticket constructors and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketValidationError {
    EmptyHeadline,
    UnknownStatus { status: String },
    UnknownType { ticket_type: String },
    UnknownEffort { points: u8 },
    NegativePlannedHours,
}

impl fmt::Display for TicketValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHeadline => write!(f, "ticket headline must not be empty"),
            Self::UnknownStatus { status } => write!(f, "unknown ticket status: {status}"),
            Self::UnknownType { ticket_type } => write!(f, "unknown ticket type: {ticket_type}"),
            Self::UnknownEffort { points } => {
                write!(f, "effort {points} is not on the effort scale")
            }
            Self::NegativePlannedHours => write!(f, "planned hours must not be negative"),
        }
    }
}

impl std::error::Error for TicketValidationError {}

/// A work item inside a project.
///
/// ## Invariants
/// - `headline` must be non-empty once trimmed of whitespace.
/// - `effort`, when set, must be a key on [`EFFORT_LABELS`].
/// - `planned_hours` must not be negative.
/// - `project_id` never changes after creation; updates preserve the binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    id: TicketId,
    project_id: ProjectId,
    parent: Option<TicketId>,
    headline: String,
    description: String,
    status: TicketStatus,
    ticket_type: TicketType,
    priority: Priority,
    effort: Option<u8>,
    planned_hours: f64,
    due: Option<NaiveDateTime>,
}

impl Ticket {
    /// Fallible constructor enforcing the ticket invariants.
    #[expect(clippy::too_many_arguments, reason = "aggregate construction site")]
    pub fn try_new(
        id: TicketId,
        project_id: ProjectId,
        parent: Option<TicketId>,
        headline: impl Into<String>,
        description: impl Into<String>,
        status: TicketStatus,
        ticket_type: TicketType,
        priority: Priority,
        effort: Option<u8>,
        planned_hours: f64,
        due: Option<NaiveDateTime>,
    ) -> Result<Self, TicketValidationError> {
        let headline = headline.into();
        if headline.trim().is_empty() {
            return Err(TicketValidationError::EmptyHeadline);
        }
        if let Some(points) = effort {
            if effort_label(points).is_none() {
                return Err(TicketValidationError::UnknownEffort { points });
            }
        }
        if planned_hours < 0.0 {
            return Err(TicketValidationError::NegativePlannedHours);
        }
        Ok(Self {
            id,
            project_id,
            parent,
            headline,
            description: description.into(),
            status,
            ticket_type,
            priority,
            effort,
            planned_hours,
            due,
        })
    }

    /// Stable ticket identifier.
    pub fn id(&self) -> TicketId {
        self.id
    }

    /// Project this ticket belongs to.
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Parent ticket when this ticket is a subtask.
    pub fn parent(&self) -> Option<TicketId> {
        self.parent
    }

    /// One-line summary of the work.
    pub fn headline(&self) -> &str {
        self.headline.as_str()
    }

    /// Longer description of the work.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Workflow status.
    pub fn status(&self) -> TicketStatus {
        self.status
    }

    /// Kind of work this ticket represents.
    pub fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    /// Urgency of the work.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Effort key on [`EFFORT_LABELS`], when estimated.
    pub fn effort(&self) -> Option<u8> {
        self.effort
    }

    /// Hours planned for the work.
    pub fn planned_hours(&self) -> f64 {
        self.planned_hours
    }

    /// Deadline, when one is set.
    pub fn due(&self) -> Option<NaiveDateTime> {
        self.due
    }

    /// Apply an update, preserving identity and project binding.
    pub fn apply(&mut self, update: &TicketUpdate) -> Result<(), TicketValidationError> {
        if let Some(headline) = &update.headline {
            if headline.trim().is_empty() {
                return Err(TicketValidationError::EmptyHeadline);
            }
            self.headline = headline.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(ticket_type) = update.ticket_type {
            self.ticket_type = ticket_type;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(points) = update.effort {
            if effort_label(points).is_none() {
                return Err(TicketValidationError::UnknownEffort { points });
            }
            self.effort = Some(points);
        }
        if let Some(hours) = update.planned_hours {
            if hours < 0.0 {
                return Err(TicketValidationError::NegativePlannedHours);
            }
            self.planned_hours = hours;
        }
        if let Some(due) = update.due {
            self.due = due;
        }
        if let Some(parent) = update.parent {
            self.parent = parent;
        }
        Ok(())
    }

    /// Mark the ticket done.
    pub fn close(&mut self) {
        self.status = TicketStatus::Done;
    }
}

/// Partial update of a ticket's editable fields.
///
/// `None` leaves a field unchanged. `due` and `parent` use a nested `Option`
/// so an update can clear them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketUpdate {
    pub headline: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub ticket_type: Option<TicketType>,
    pub priority: Option<Priority>,
    pub effort: Option<u8>,
    pub planned_hours: Option<f64>,
    pub due: Option<Option<NaiveDateTime>>,
    pub parent: Option<Option<TicketId>>,
}

/// Form values for creating or updating a subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtaskForm {
    /// Existing subtask to update; `None` creates a new one.
    pub id: Option<TicketId>,
    pub headline: String,
    pub description: String,
    pub status: TicketStatus,
}

/// Identifiers of every ticket reachable from `root` by following `parent`
/// links downwards.
///
/// Walks breadth-first with a visited guard so malformed parent cycles in
/// stored data cannot loop.
pub fn descendants_of(tickets: &[Ticket], root: TicketId) -> BTreeSet<TicketId> {
    let mut found = BTreeSet::new();
    let mut frontier = vec![root];
    while let Some(current) = frontier.pop() {
        for ticket in tickets {
            if ticket.parent() == Some(current) && found.insert(ticket.id()) {
                frontier.push(ticket.id());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ticket(id: u64, parent: Option<u64>) -> Ticket {
        Ticket::try_new(
            TicketId::new(id),
            ProjectId::new(1),
            parent.map(TicketId::new),
            format!("ticket {id}"),
            "",
            TicketStatus::New,
            TicketType::Task,
            Priority::Medium,
            None,
            0.0,
            None,
        )
        .expect("valid ticket")
    }

    #[rstest]
    #[case("new", Ok(TicketStatus::New))]
    #[case("in_progress", Ok(TicketStatus::InProgress))]
    #[case("done", Ok(TicketStatus::Done))]
    #[case("finished", Err(()))]
    fn status_parses_stable_identifiers(
        #[case] raw: &str,
        #[case] expected: Result<TicketStatus, ()>,
    ) {
        assert_eq!(raw.parse::<TicketStatus>().map_err(|_| ()), expected);
    }

    #[rstest]
    fn milestone_type_parses_and_labels() {
        let kind: TicketType = "milestone".parse().expect("known type");
        assert_eq!(kind, TicketType::Milestone);
        assert_eq!(kind.label(), "Milestone");
        assert_eq!(kind.icon(), "fa-flag");
    }

    #[rstest]
    fn effort_scale_rejects_off_scale_points() {
        assert_eq!(effort_label(5), Some("L"));
        assert_eq!(effort_label(4), None);

        let mut subject = ticket(1, None);
        let err = subject
            .apply(&TicketUpdate {
                effort: Some(4),
                ..TicketUpdate::default()
            })
            .expect_err("off-scale effort");
        assert_eq!(err, TicketValidationError::UnknownEffort { points: 4 });
    }

    #[rstest]
    fn apply_rejects_blank_headline_and_keeps_ticket_unchanged() {
        let mut subject = ticket(1, None);
        let before = subject.clone();

        let err = subject
            .apply(&TicketUpdate {
                headline: Some("   ".to_owned()),
                ..TicketUpdate::default()
            })
            .expect_err("blank headline");

        assert_eq!(err, TicketValidationError::EmptyHeadline);
        assert_eq!(subject, before);
    }

    #[rstest]
    fn apply_updates_editable_fields() {
        let mut subject = ticket(1, None);
        subject
            .apply(&TicketUpdate {
                headline: Some("Ship the launch checklist".to_owned()),
                status: Some(TicketStatus::InProgress),
                priority: Some(Priority::High),
                planned_hours: Some(6.5),
                ..TicketUpdate::default()
            })
            .expect("valid update");

        assert_eq!(subject.headline(), "Ship the launch checklist");
        assert_eq!(subject.status(), TicketStatus::InProgress);
        assert_eq!(subject.priority(), Priority::High);
        assert!((subject.planned_hours() - 6.5).abs() < f64::EPSILON);
    }

    #[rstest]
    fn descendants_follow_parent_chains() {
        let tickets = vec![
            ticket(1, None),
            ticket(2, Some(1)),
            ticket(3, Some(2)),
            ticket(4, None),
        ];

        let found = descendants_of(&tickets, TicketId::new(1));
        assert_eq!(
            found,
            BTreeSet::from([TicketId::new(2), TicketId::new(3)])
        );
    }

    #[rstest]
    fn descendants_survive_parent_cycles() {
        // 1 -> 2 and 2 -> 1 form a loop in stored data; the walk must
        // terminate and report both members of the cycle.
        let tickets = vec![ticket(1, Some(2)), ticket(2, Some(1))];

        let found = descendants_of(&tickets, TicketId::new(1));
        assert_eq!(
            found,
            BTreeSet::from([TicketId::new(1), TicketId::new(2)])
        );
    }
}
