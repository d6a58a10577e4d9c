//! In-memory user directory.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{CredentialRecord, UserDirectory, UserDirectoryError};
use crate::domain::{User, UserId};

struct Inner {
    by_id: BTreeMap<Uuid, CredentialRecord>,
    by_username: BTreeMap<String, Uuid>,
}

/// User directory backed by a process-local map.
pub struct MemoryUserDirectory {
    inner: RwLock<Inner>,
}

impl MemoryUserDirectory {
    /// An empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                by_id: BTreeMap::new(),
                by_username: BTreeMap::new(),
            }),
        }
    }

    /// Store an account with its credential digest.
    ///
    /// A later record for the same username replaces the earlier one.
    pub fn put(&self, record: CredentialRecord) -> Result<(), UserDirectoryError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| UserDirectoryError::connection("user directory lock poisoned"))?;
        let id = *record.user.id().as_uuid();
        inner
            .by_username
            .insert(record.user.username().to_string(), id);
        inner.by_id.insert(id, record);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, UserDirectoryError> {
        self.inner
            .read()
            .map_err(|_| UserDirectoryError::connection("user directory lock poisoned"))
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(self
            .read()?
            .by_id
            .get(id.as_uuid())
            .map(|record| record.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, UserDirectoryError> {
        let inner = self.read()?;
        Ok(inner
            .by_username
            .get(username)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Role, password_digest};

    fn record(username: &str, role: Role) -> CredentialRecord {
        CredentialRecord {
            user: User::try_from_strings(UserId::random(), username, "Erna Solberg", role)
                .expect("valid user"),
            password_sha256: password_digest("hunter2"),
        }
    }

    #[tokio::test]
    async fn accounts_are_found_by_username_and_id() {
        let directory = MemoryUserDirectory::new();
        let stored = record("erna", Role::Manager);
        let id = *stored.user.id();
        directory.put(stored).expect("put");

        let by_name = directory
            .find_by_username("erna")
            .await
            .expect("lookup")
            .expect("record exists");
        assert_eq!(by_name.user.id(), &id);

        let by_id = directory.find(&id).await.expect("lookup");
        assert_eq!(by_id.map(|user| user.role()), Some(Role::Manager));
    }

    #[tokio::test]
    async fn replacing_a_username_keeps_one_account() {
        let directory = MemoryUserDirectory::new();
        directory.put(record("erna", Role::Editor)).expect("put");
        directory.put(record("erna", Role::Manager)).expect("put");

        let found = directory
            .find_by_username("erna")
            .await
            .expect("lookup")
            .expect("record exists");
        assert_eq!(found.user.role(), Role::Manager);
    }
}
