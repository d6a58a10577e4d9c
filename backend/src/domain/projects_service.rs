//! Project domain services.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    ProjectRepository, ProjectRepositoryError, ProjectService, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{Error, Project, ProjectId, Ticket, User};

fn map_repository_error(error: ProjectRepositoryError) -> Error {
    match error {
        ProjectRepositoryError::Connection { message } => {
            Error::internal(format!("project repository unavailable: {message}"))
        }
        ProjectRepositoryError::Query { message } => {
            Error::internal(format!("project repository error: {message}"))
        }
    }
}

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::internal(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

/// Project service joining project records with the user directory.
pub struct DirectoryProjectService<P, U> {
    projects: Arc<P>,
    directory: Arc<U>,
}

impl<P, U> DirectoryProjectService<P, U> {
    /// Create a new service over the project repository and user directory.
    pub fn new(projects: Arc<P>, directory: Arc<U>) -> Self {
        Self {
            projects,
            directory,
        }
    }
}

#[async_trait]
impl<P, U> ProjectService for DirectoryProjectService<P, U>
where
    P: ProjectRepository,
    U: UserDirectory,
{
    async fn project(&self, id: ProjectId) -> Result<Project, Error> {
        self.projects
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("project {id} not found")))
    }

    async fn users_assigned(&self, project: ProjectId) -> Result<Vec<User>, Error> {
        let project = self.project(project).await?;
        let mut users = Vec::with_capacity(project.assigned_users().len());
        for id in project.assigned_users() {
            // Assignments can outlive accounts; skip ids the directory no
            // longer knows.
            if let Some(user) = self
                .directory
                .find(id)
                .await
                .map_err(map_directory_error)?
            {
                users.push(user);
            }
        }
        Ok(users)
    }

    fn switch_target(&self, current: Option<ProjectId>, ticket: &Ticket) -> Option<ProjectId> {
        (current != Some(ticket.project_id())).then(|| ticket.project_id())
    }
}
