//! Project aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::users::UserId;

/// Stable project identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProjectId(u64);

impl ProjectId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors returned by [`Project::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyName,
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name must not be empty"),
        }
    }
}

impl std::error::Error for ProjectValidationError {}

/// A project grouping tickets and the users assigned to work on them.
///
/// ## Invariants
/// - `name` must be non-empty once trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    name: String,
    assigned_users: Vec<UserId>,
}

impl Project {
    /// Fallible constructor enforcing the name invariant.
    pub fn try_new(
        id: ProjectId,
        name: impl Into<String>,
        assigned_users: Vec<UserId>,
    ) -> Result<Self, ProjectValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            assigned_users,
        })
    }

    /// Stable project identifier.
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Project name shown in fragments.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Users assigned to work on this project.
    pub fn assigned_users(&self) -> &[UserId] {
        &self.assigned_users
    }

    /// Whether a user is assigned to this project.
    pub fn is_assigned(&self, user: &UserId) -> bool {
        self.assigned_users.contains(user)
    }
}
