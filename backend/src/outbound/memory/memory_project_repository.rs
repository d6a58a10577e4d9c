//! In-memory project store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{Project, ProjectId};

/// Project repository backed by a process-local map.
pub struct MemoryProjectRepository {
    projects: RwLock<BTreeMap<u64, Project>>,
}

impl MemoryProjectRepository {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Store a project under its own identifier.
    pub fn put(&self, project: Project) -> Result<(), ProjectRepositoryError> {
        let mut projects = self
            .projects
            .write()
            .map_err(|_| ProjectRepositoryError::connection("project store lock poisoned"))?;
        projects.insert(project.id().value(), project);
        Ok(())
    }
}

impl Default for MemoryProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn find(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let projects = self
            .projects
            .read()
            .map_err(|_| ProjectRepositoryError::connection("project store lock poisoned"))?;
        Ok(projects.get(&id.value()).cloned())
    }
}
