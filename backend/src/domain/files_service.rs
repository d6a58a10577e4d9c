//! Attachment domain services.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{FileRepository, FileRepositoryError, FileService};
use crate::domain::{Error, FileId, Module, StoredFile, UserId};

fn map_repository_error(error: FileRepositoryError) -> Error {
    match error {
        FileRepositoryError::Connection { message } => {
            Error::internal(format!("file repository unavailable: {message}"))
        }
        FileRepositoryError::Query { message } => {
            Error::internal(format!("file repository error: {message}"))
        }
        FileRepositoryError::Missing { id } => Error::not_found(format!("file {id} not found")),
    }
}

/// Repository-backed attachment service.
pub struct RepositoryFileService<R> {
    files: Arc<R>,
}

impl<R> RepositoryFileService<R> {
    /// Create a new service over the file repository.
    pub fn new(files: Arc<R>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl<R> FileService for RepositoryFileService<R>
where
    R: FileRepository,
{
    async fn files_for(
        &self,
        module: Module,
        entity_id: u64,
    ) -> Result<Vec<StoredFile>, Error> {
        self.files
            .list(module, entity_id)
            .await
            .map_err(map_repository_error)
    }

    async fn attach(
        &self,
        module: Module,
        entity_id: u64,
        uploader: UserId,
        file_name: &str,
    ) -> Result<StoredFile, Error> {
        if file_name.trim().is_empty() {
            return Err(Error::invalid_request("file name must not be empty"));
        }
        self.files
            .insert(module, entity_id, uploader, file_name.to_owned())
            .await
            .map_err(map_repository_error)
    }

    async fn delete_file(&self, id: FileId) -> Result<(), Error> {
        self.files.delete(id).await.map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockFileRepository;

    fn make_service(repo: MockFileRepository) -> RepositoryFileService<MockFileRepository> {
        RepositoryFileService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn blank_file_names_never_reach_the_repository() {
        let mut repo = MockFileRepository::new();
        repo.expect_insert().times(0);

        let service = make_service(repo);
        let err = service
            .attach(Module::Ticket, 7, UserId::random(), " ")
            .await
            .expect_err("blank name");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn uploads_keep_their_entity_binding() {
        let mut repo = MockFileRepository::new();
        repo.expect_insert()
            .withf(|module, entity_id, _uploader, name| {
                *module == Module::Ticket && *entity_id == 7 && name == "mockup.png"
            })
            .times(1)
            .return_once(|module, entity_id, uploader, name| {
                StoredFile::try_from_upload(FileId::new(1), module, entity_id, uploader, &name)
                    .map_err(|err| FileRepositoryError::query(err.to_string()))
            });

        let service = make_service(repo);
        let stored = service
            .attach(Module::Ticket, 7, UserId::random(), "mockup.png")
            .await
            .expect("stored upload");
        assert!(stored.is_image());
    }

    #[tokio::test]
    async fn deleting_missing_files_reports_not_found() {
        let mut repo = MockFileRepository::new();
        repo.expect_delete()
            .times(1)
            .return_once(|id: FileId| Err(FileRepositoryError::missing(id.value())));

        let service = make_service(repo);
        let err = service
            .delete_file(FileId::new(3))
            .await
            .expect_err("missing file");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
