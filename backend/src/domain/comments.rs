//! Comments attached to entities across modules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserId;

/// Application module an entity belongs to.
///
/// Comments and files bind to an entity through a module key plus the
/// entity's numeric identifier, so one store serves tickets, calendar
/// events, and projects alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Ticket,
    Calendar,
    Project,
}

impl Module {
    /// Stable module key used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::Calendar => "calendar",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = CommentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ticket" => Ok(Self::Ticket),
            "calendar" => Ok(Self::Calendar),
            "project" => Ok(Self::Project),
            other => Err(CommentValidationError::UnknownModule {
                module: other.to_owned(),
            }),
        }
    }
}

/// Stable comment identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(u64);

impl CommentId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised by comment constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyText,
    UnknownModule { module: String },
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "comment text must not be empty"),
            Self::UnknownModule { module } => write!(f, "unknown module key: {module}"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// A comment left on an entity.
///
/// ## Invariants
/// - `text` must be non-empty once trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: CommentId,
    module: Module,
    entity_id: u64,
    author: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Fallible constructor enforcing the text invariant.
    pub fn try_new(
        id: CommentId,
        module: Module,
        entity_id: u64,
        author: UserId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CommentValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        Ok(Self {
            id,
            module,
            entity_id,
            author,
            text,
            created_at,
        })
    }

    /// Stable comment identifier.
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Module of the entity this comment is attached to.
    pub fn module(&self) -> Module {
        self.module
    }

    /// Identifier of the entity this comment is attached to.
    pub fn entity_id(&self) -> u64 {
        self.entity_id
    }

    /// User who wrote the comment.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Comment body.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// When the comment was written.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
