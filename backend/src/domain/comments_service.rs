//! Comment domain services.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CommentRepository, CommentRepositoryError, CommentService};
use crate::domain::{Comment, CommentId, Error, Module, UserId};

fn map_repository_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::internal(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::Missing { id } => {
            Error::not_found(format!("comment {id} not found"))
        }
    }
}

/// Repository-backed comment service.
pub struct RepositoryCommentService<R> {
    comments: Arc<R>,
}

impl<R> RepositoryCommentService<R> {
    /// Create a new service over the comment repository.
    pub fn new(comments: Arc<R>) -> Self {
        Self { comments }
    }
}

#[async_trait]
impl<R> CommentService for RepositoryCommentService<R>
where
    R: CommentRepository,
{
    async fn comments_for(
        &self,
        module: Module,
        entity_id: u64,
    ) -> Result<Vec<Comment>, Error> {
        self.comments
            .list(module, entity_id)
            .await
            .map_err(map_repository_error)
    }

    async fn add_comment(
        &self,
        module: Module,
        entity_id: u64,
        author: UserId,
        text: &str,
    ) -> Result<Comment, Error> {
        if text.trim().is_empty() {
            return Err(Error::invalid_request("comment text must not be empty"));
        }
        self.comments
            .insert(module, entity_id, author, text.to_owned())
            .await
            .map_err(map_repository_error)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        self.comments
            .delete(id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCommentRepository;

    fn make_service(repo: MockCommentRepository) -> RepositoryCommentService<MockCommentRepository> {
        RepositoryCommentService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn blank_comments_never_reach_the_repository() {
        let mut repo = MockCommentRepository::new();
        repo.expect_insert().times(0);

        let service = make_service(repo);
        let err = service
            .add_comment(Module::Ticket, 7, UserId::random(), "   ")
            .await
            .expect_err("blank text");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn comments_pass_through_with_their_module_binding() {
        let author = UserId::random();
        let mut repo = MockCommentRepository::new();
        repo.expect_insert()
            .withf(move |module, entity_id, got_author, text| {
                *module == Module::Ticket
                    && *entity_id == 7
                    && got_author == &author
                    && text == "Looks good"
            })
            .times(1)
            .return_once(|module, entity_id, author, text| {
                Comment::try_new(
                    CommentId::new(1),
                    module,
                    entity_id,
                    author,
                    text,
                    chrono::Utc::now(),
                )
                .map_err(|err| CommentRepositoryError::query(err.to_string()))
            });

        let service = make_service(repo);
        let comment = service
            .add_comment(Module::Ticket, 7, author, "Looks good")
            .await
            .expect("stored comment");
        assert_eq!(comment.id(), CommentId::new(1));
    }

    #[tokio::test]
    async fn deleting_missing_comments_reports_not_found() {
        let mut repo = MockCommentRepository::new();
        repo.expect_delete()
            .times(1)
            .return_once(|id: CommentId| Err(CommentRepositoryError::missing(id.value())));

        let service = make_service(repo);
        let err = service
            .delete_comment(CommentId::new(9))
            .await
            .expect_err("missing comment");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
