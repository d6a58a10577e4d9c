//! Driving port for project use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Project, ProjectId, Ticket, User};

/// Domain use-case port for projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Fetch a project, failing with `NotFound` when it does not exist.
    async fn project(&self, id: ProjectId) -> Result<Project, Error>;

    /// User accounts assigned to a project, in assignment order.
    async fn users_assigned(&self, project: ProjectId) -> Result<Vec<User>, Error>;

    /// The project the session should switch to before showing a ticket.
    ///
    /// Returns `Some` when the ticket belongs to a different project than
    /// the session's current one; `None` means no switch is needed.
    fn switch_target(&self, current: Option<ProjectId>, ticket: &Ticket) -> Option<ProjectId>;
}

/// Fixture service over an empty project store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectService;

#[async_trait]
impl ProjectService for FixtureProjectService {
    async fn project(&self, id: ProjectId) -> Result<Project, Error> {
        Err(Error::not_found(format!("project {id} not found")))
    }

    async fn users_assigned(&self, _project: ProjectId) -> Result<Vec<User>, Error> {
        Ok(Vec::new())
    }

    fn switch_target(&self, current: Option<ProjectId>, ticket: &Ticket) -> Option<ProjectId> {
        (current != Some(ticket.project_id())).then(|| ticket.project_id())
    }
}
