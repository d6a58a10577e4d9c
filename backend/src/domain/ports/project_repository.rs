//! Port for project persistence.

use async_trait::async_trait;

use crate::domain::{Project, ProjectId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "project repository query failed: {message}",
    }
}

/// Port for project lookup.
///
/// Projects are administered elsewhere; this surface only reads them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Fetch a project by identifier.
    async fn find(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectRepository;

#[async_trait]
impl ProjectRepository for FixtureProjectRepository {
    async fn find(&self, _id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(None)
    }
}
