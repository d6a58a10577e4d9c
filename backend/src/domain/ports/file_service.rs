//! Driving port for attachment use-cases.

use async_trait::async_trait;

use crate::domain::{Error, FileId, Module, StoredFile, UserId};

/// Domain use-case port for file attachments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileService: Send + Sync {
    /// Attachments on one entity, in upload order.
    async fn files_for(&self, module: Module, entity_id: u64)
        -> Result<Vec<StoredFile>, Error>;

    /// Record an upload, rejecting blank file names with `InvalidRequest`.
    async fn attach(
        &self,
        module: Module,
        entity_id: u64,
        uploader: UserId,
        file_name: &str,
    ) -> Result<StoredFile, Error>;

    /// Remove an attachment, failing with `NotFound` when it does not exist.
    async fn delete_file(&self, id: FileId) -> Result<(), Error>;
}

/// Fixture service over an empty attachment store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFileService;

#[async_trait]
impl FileService for FixtureFileService {
    async fn files_for(
        &self,
        _module: Module,
        _entity_id: u64,
    ) -> Result<Vec<StoredFile>, Error> {
        Ok(Vec::new())
    }

    async fn attach(
        &self,
        module: Module,
        entity_id: u64,
        uploader: UserId,
        file_name: &str,
    ) -> Result<StoredFile, Error> {
        StoredFile::try_from_upload(FileId::new(0), module, entity_id, uploader, file_name)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn delete_file(&self, id: FileId) -> Result<(), Error> {
        Err(Error::not_found(format!("file {id} not found")))
    }
}
