//! Port for file attachment metadata persistence.
//!
//! Only metadata crosses this boundary. Blob storage lives behind the
//! adapter, keyed by the allocated file identifier.

use async_trait::async_trait;

use crate::domain::{FileId, Module, StoredFile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by file repository adapters.
    pub enum FileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "file repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "file repository query failed: {message}",
        /// No file with the given identifier exists.
        Missing { id: u64 } =>
            "file {id} not found",
    }
}

/// Port for attachment metadata storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Attachments on one entity, in upload order.
    async fn list(
        &self,
        module: Module,
        entity_id: u64,
    ) -> Result<Vec<StoredFile>, FileRepositoryError>;

    /// Fetch attachment metadata by identifier.
    async fn find(&self, id: FileId) -> Result<Option<StoredFile>, FileRepositoryError>;

    /// Record an upload and allocate its identifier.
    async fn insert(
        &self,
        module: Module,
        entity_id: u64,
        uploader: UserId,
        file_name: String,
    ) -> Result<StoredFile, FileRepositoryError>;

    /// Remove an attachment.
    ///
    /// Fails with [`FileRepositoryError::Missing`] when no such file exists.
    async fn delete(&self, id: FileId) -> Result<(), FileRepositoryError>;
}

/// Fixture implementation for testing without a real store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFileRepository;

#[async_trait]
impl FileRepository for FixtureFileRepository {
    async fn list(
        &self,
        _module: Module,
        _entity_id: u64,
    ) -> Result<Vec<StoredFile>, FileRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: FileId) -> Result<Option<StoredFile>, FileRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        module: Module,
        entity_id: u64,
        uploader: UserId,
        file_name: String,
    ) -> Result<StoredFile, FileRepositoryError> {
        StoredFile::try_from_upload(FileId::new(0), module, entity_id, uploader, &file_name)
            .map_err(|err| FileRepositoryError::query(err.to_string()))
    }

    async fn delete(&self, _id: FileId) -> Result<(), FileRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_repository_splits_uploaded_names() {
        let repo = FixtureFileRepository;
        let stored = repo
            .insert(Module::Ticket, 7, UserId::random(), "mockup.PNG".into())
            .await
            .expect("fixture insert should succeed");
        assert_eq!(stored.name(), "mockup");
        assert_eq!(stored.extension(), "png");
        assert!(stored.is_image());
    }

    #[tokio::test]
    async fn fixture_repository_rejects_blank_names() {
        let repo = FixtureFileRepository;
        let result = repo
            .insert(Module::Ticket, 7, UserId::random(), "   ".into())
            .await;
        assert!(matches!(result, Err(FileRepositoryError::Query { .. })));
    }
}
