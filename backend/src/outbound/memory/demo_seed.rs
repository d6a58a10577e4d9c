//! Demo data provisioning for the memory stores.
//!
//! Development servers and integration tests get a small, deterministic
//! workspace: one project, a ticket with a subtask, comments, an
//! attachment, logged hours, and a calendar per account. Identifiers are
//! fixed so clients and tests can link straight to records.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::ports::CredentialRecord;
use crate::domain::{
    CalendarEvent, Comment, CommentId, EventId, FileId, HourKind, Module, Priority, Project,
    ProjectId, Role, StoredFile, Ticket, TicketId, TicketStatus, TicketType, TimesheetEntry,
    TimesheetId, User, UserId, password_digest,
};

use super::{
    MemoryCalendarRepository, MemoryCommentRepository, MemoryFileRepository,
    MemoryProjectRepository, MemoryTicketRepository, MemoryTimesheetRepository,
    MemoryUserDirectory,
};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "crewdeck-demo";

/// The project the demo accounts start in.
pub const DEMO_PROJECT_ID: u64 = 1;

const ERNA_ID: &str = "a1f5c9e2-4b3d-4e6f-8a70-1c2d3e4f5a6b";
const THEO_ID: &str = "b2e6d0f3-5c4e-4f70-9b81-2d3e4f5a6b7c";

/// Raised when the built-in demo records fail to provision.
///
/// Only reachable through a defect in the seed constants themselves, so the
/// message is all callers need.
#[derive(Debug, Error)]
#[error("demo seed failed: {0}")]
pub struct DemoSeedError(String);

fn seed_err(err: impl std::fmt::Display) -> DemoSeedError {
    DemoSeedError(err.to_string())
}

/// Populated memory stores plus the accounts seeded into them.
pub struct DemoSeed {
    pub tickets: Arc<MemoryTicketRepository>,
    pub comments: Arc<MemoryCommentRepository>,
    pub files: Arc<MemoryFileRepository>,
    pub timesheets: Arc<MemoryTimesheetRepository>,
    pub calendars: Arc<MemoryCalendarRepository>,
    pub projects: Arc<MemoryProjectRepository>,
    pub directory: Arc<MemoryUserDirectory>,
    /// Admin account (`erna`).
    pub erna: User,
    /// Editor account (`theo`).
    pub theo: User,
}

impl DemoSeed {
    /// Build fresh stores and fill them with the demo workspace.
    ///
    /// # Errors
    /// Fails only when the seed constants themselves are invalid, which is
    /// a defect worth surfacing at startup rather than masking.
    pub fn provision() -> Result<Self, DemoSeedError> {
        let seed = Self {
            tickets: Arc::new(MemoryTicketRepository::new()),
            comments: Arc::new(MemoryCommentRepository::new()),
            files: Arc::new(MemoryFileRepository::new()),
            timesheets: Arc::new(MemoryTimesheetRepository::new()),
            calendars: Arc::new(MemoryCalendarRepository::new()),
            projects: Arc::new(MemoryProjectRepository::new()),
            directory: Arc::new(MemoryUserDirectory::new()),
            erna: User::try_from_strings(
                UserId::new(ERNA_ID).map_err(seed_err)?,
                "erna",
                "Erna Vogel",
                Role::Admin,
            )
            .map_err(seed_err)?,
            theo: User::try_from_strings(
                UserId::new(THEO_ID).map_err(seed_err)?,
                "theo",
                "Theo Brandt",
                Role::Editor,
            )
            .map_err(seed_err)?,
        };
        seed.fill()?;
        Ok(seed)
    }

    fn fill(&self) -> Result<(), DemoSeedError> {
        for user in [&self.erna, &self.theo] {
            self.directory
                .put(CredentialRecord {
                    user: user.clone(),
                    password_sha256: password_digest(DEMO_PASSWORD),
                })
                .map_err(seed_err)?;
        }

        let erna = *self.erna.id();
        let theo = *self.theo.id();
        let project = ProjectId::new(DEMO_PROJECT_ID);

        self.projects
            .put(
                Project::try_new(project, "Crewdeck Launch", vec![erna, theo])
                    .map_err(seed_err)?,
            )
            .map_err(seed_err)?;

        let launch = Ticket::try_new(
            TicketId::new(1),
            project,
            None,
            "Prepare the launch checklist",
            "Collect every blocker for the public launch.",
            TicketStatus::InProgress,
            TicketType::Story,
            Priority::High,
            Some(5),
            16.0,
            date(2026, 9, 30).and_hms_opt(17, 0, 0),
        )
        .map_err(seed_err)?;
        let signup = Ticket::try_new(
            TicketId::new(2),
            project,
            None,
            "Fix the signup button",
            "The button stays disabled after a validation error.",
            TicketStatus::New,
            TicketType::Bug,
            Priority::Critical,
            Some(2),
            4.0,
            None,
        )
        .map_err(seed_err)?;
        let dry_run = Ticket::try_new(
            TicketId::new(3),
            project,
            Some(TicketId::new(1)),
            "Dry-run the release script",
            "",
            TicketStatus::New,
            TicketType::Task,
            Priority::Medium,
            None,
            0.0,
            None,
        )
        .map_err(seed_err)?;
        for ticket in [launch, signup, dry_run] {
            self.tickets.put(ticket).map_err(seed_err)?;
        }

        self.comments
            .put(
                Comment::try_new(
                    CommentId::new(1),
                    Module::Ticket,
                    1,
                    theo,
                    "Checklist draft is in the shared folder.",
                    date(2026, 8, 10).and_hms_opt(9, 30, 0).map_or_else(
                        || chrono::Utc::now(),
                        |naive| naive.and_utc(),
                    ),
                )
                .map_err(seed_err)?,
            )
            .map_err(seed_err)?;

        self.files
            .put(
                StoredFile::try_from_upload(
                    FileId::new(1),
                    Module::Ticket,
                    1,
                    erna,
                    "launch-checklist.png",
                )
                .map_err(seed_err)?,
            )
            .map_err(seed_err)?;

        self.timesheets
            .put(
                TimesheetEntry::try_new(
                    TimesheetId::new(0),
                    TicketId::new(1),
                    theo,
                    HourKind::Development,
                    date(2026, 8, 11),
                    3.5,
                    "Checklist automation",
                )
                .map_err(seed_err)?,
            )
            .map_err(seed_err)?;

        let erna_event = CalendarEvent::try_new(
            EventId::new(1),
            erna,
            "Launch readiness review",
            date(2026, 9, 1).and_hms_opt(10, 0, 0),
            date(2026, 9, 1).and_hms_opt(11, 0, 0),
            false,
        )
        .map_err(seed_err)?;
        let theo_event = CalendarEvent::try_new(
            EventId::new(2),
            theo,
            "Focus block",
            date(2026, 9, 2).and_hms_opt(13, 0, 0),
            None,
            true,
        )
        .map_err(seed_err)?;
        for event in [erna_event, theo_event] {
            self.calendars.put(event).map_err(seed_err)?;
        }

        Ok(())
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // The seed only uses calendar dates that exist.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        CalendarRepository, CommentRepository, TicketRepository, UserDirectory,
    };

    #[tokio::test]
    async fn the_demo_workspace_provisions_completely() {
        let seed = DemoSeed::provision().expect("seed provisions");

        let erna = seed
            .directory
            .find_by_username("erna")
            .await
            .expect("lookup")
            .expect("account exists");
        assert_eq!(erna.password_sha256, password_digest(DEMO_PASSWORD));

        let tickets = seed
            .tickets
            .list_for_project(ProjectId::new(DEMO_PROJECT_ID))
            .await
            .expect("list");
        assert_eq!(tickets.len(), 3);

        let subtasks = seed
            .tickets
            .children_of(TicketId::new(1))
            .await
            .expect("children");
        assert_eq!(subtasks.len(), 1);

        let comments = seed.comments.list(Module::Ticket, 1).await.expect("list");
        assert_eq!(comments.len(), 1);

        let events = seed
            .calendars
            .list_for_user(seed.theo.id())
            .await
            .expect("list");
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn seeded_ids_leave_room_for_new_records() {
        let seed = DemoSeed::provision().expect("seed provisions");
        let form = crate::domain::SubtaskForm {
            id: None,
            headline: "New subtask".into(),
            description: "".into(),
            status: TicketStatus::New,
        };
        let created = seed
            .tickets
            .insert_subtask(ProjectId::new(DEMO_PROJECT_ID), TicketId::new(1), form)
            .await
            .expect("insert");
        assert_eq!(created.id(), TicketId::new(4));
    }
}
