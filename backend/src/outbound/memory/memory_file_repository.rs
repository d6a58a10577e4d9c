//! In-memory attachment metadata store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{FileRepository, FileRepositoryError};
use crate::domain::{FileId, Module, StoredFile, UserId};

struct Inner {
    files: BTreeMap<u64, StoredFile>,
    next_id: u64,
}

/// File repository backed by a process-local map.
///
/// Only upload metadata is stored; the bytes themselves are outside this
/// system's scope.
pub struct MemoryFileRepository {
    inner: RwLock<Inner>,
}

impl MemoryFileRepository {
    /// An empty store; the first allocated identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                files: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store an attachment record under its own identifier.
    pub fn put(&self, file: StoredFile) -> Result<(), FileRepositoryError> {
        let mut inner = self.write()?;
        let id = file.id().value();
        inner.next_id = inner.next_id.max(id.saturating_add(1));
        inner.files.insert(id, file);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, FileRepositoryError> {
        self.inner
            .read()
            .map_err(|_| FileRepositoryError::connection("file store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, FileRepositoryError> {
        self.inner
            .write()
            .map_err(|_| FileRepositoryError::connection("file store lock poisoned"))
    }
}

impl Default for MemoryFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn list(
        &self,
        module: Module,
        entity_id: u64,
    ) -> Result<Vec<StoredFile>, FileRepositoryError> {
        Ok(self
            .read()?
            .files
            .values()
            .filter(|file| file.module() == module && file.entity_id() == entity_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: FileId) -> Result<Option<StoredFile>, FileRepositoryError> {
        Ok(self.read()?.files.get(&id.value()).cloned())
    }

    async fn insert(
        &self,
        module: Module,
        entity_id: u64,
        uploader: UserId,
        file_name: String,
    ) -> Result<StoredFile, FileRepositoryError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        let file = StoredFile::try_from_upload(FileId::new(id), module, entity_id, uploader, &file_name)
            .map_err(|err| FileRepositoryError::query(err.to_string()))?;
        inner.next_id = id.saturating_add(1);
        inner.files.insert(id, file.clone());
        Ok(file)
    }

    async fn delete(&self, id: FileId) -> Result<(), FileRepositoryError> {
        let mut inner = self.write()?;
        inner
            .files
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| FileRepositoryError::missing(id.value()))
    }
}
