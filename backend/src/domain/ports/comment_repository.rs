//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Module, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
        /// No comment with the given identifier exists.
        Missing { id: u64 } =>
            "comment {id} not found",
    }
}

/// Port for comment storage and retrieval.
///
/// Comments attach to an entity of a module, so a ticket and a calendar
/// event with the same numeric id never share a thread. The adapter
/// allocates identifiers and creation timestamps on insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on one entity, oldest first.
    async fn list(
        &self,
        module: Module,
        entity_id: u64,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Fetch a comment by identifier.
    async fn find(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Store a new comment and allocate its identifier.
    async fn insert(
        &self,
        module: Module,
        entity_id: u64,
        author: UserId,
        text: String,
    ) -> Result<Comment, CommentRepositoryError>;

    /// Remove a comment.
    ///
    /// Fails with [`CommentRepositoryError::Missing`] when no such comment
    /// exists.
    async fn delete(&self, id: CommentId) -> Result<(), CommentRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentRepository;

#[async_trait]
impl CommentRepository for FixtureCommentRepository {
    async fn list(
        &self,
        _module: Module,
        _entity_id: u64,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        module: Module,
        entity_id: u64,
        author: UserId,
        text: String,
    ) -> Result<Comment, CommentRepositoryError> {
        Comment::try_new(
            CommentId::new(0),
            module,
            entity_id,
            author,
            text,
            chrono::Utc::now(),
        )
        .map_err(|err| CommentRepositoryError::query(err.to_string()))
    }

    async fn delete(&self, _id: CommentId) -> Result<(), CommentRepositoryError> {
        Ok(())
    }
}
