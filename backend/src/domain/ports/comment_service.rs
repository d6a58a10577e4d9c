//! Driving port for comment use-cases.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, Module, UserId};

/// Domain use-case port for comment threads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Comments on one entity, oldest first.
    async fn comments_for(&self, module: Module, entity_id: u64)
        -> Result<Vec<Comment>, Error>;

    /// Add a comment, rejecting empty text with `InvalidRequest`.
    async fn add_comment(
        &self,
        module: Module,
        entity_id: u64,
        author: UserId,
        text: &str,
    ) -> Result<Comment, Error>;

    /// Remove a comment, failing with `NotFound` when it does not exist.
    async fn delete_comment(&self, id: CommentId) -> Result<(), Error>;
}

/// Fixture service over an empty comment store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentService;

#[async_trait]
impl CommentService for FixtureCommentService {
    async fn comments_for(
        &self,
        _module: Module,
        _entity_id: u64,
    ) -> Result<Vec<Comment>, Error> {
        Ok(Vec::new())
    }

    async fn add_comment(
        &self,
        module: Module,
        entity_id: u64,
        author: UserId,
        text: &str,
    ) -> Result<Comment, Error> {
        Comment::try_new(
            CommentId::new(0),
            module,
            entity_id,
            author,
            text,
            chrono::Utc::now(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        Err(Error::not_found(format!("comment {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_service_rejects_blank_comments() {
        let service = FixtureCommentService;
        let err = service
            .add_comment(Module::Ticket, 7, UserId::random(), "   ")
            .await
            .expect_err("blank text");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn fixture_service_threads_are_empty() {
        let service = FixtureCommentService;
        let comments = service
            .comments_for(Module::Ticket, 7)
            .await
            .expect("listing succeeds");
        assert!(comments.is_empty());
    }
}
