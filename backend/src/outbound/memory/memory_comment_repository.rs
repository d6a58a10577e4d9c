//! In-memory comment store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, Module, UserId};

struct Inner {
    comments: BTreeMap<u64, Comment>,
    next_id: u64,
}

/// Comment repository backed by a process-local map.
pub struct MemoryCommentRepository {
    inner: RwLock<Inner>,
}

impl MemoryCommentRepository {
    /// An empty store; the first allocated identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                comments: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store a comment under its own identifier.
    pub fn put(&self, comment: Comment) -> Result<(), CommentRepositoryError> {
        let mut inner = self.write()?;
        let id = comment.id().value();
        inner.next_id = inner.next_id.max(id.saturating_add(1));
        inner.comments.insert(id, comment);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, CommentRepositoryError> {
        self.inner
            .read()
            .map_err(|_| CommentRepositoryError::connection("comment store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, CommentRepositoryError> {
        self.inner
            .write()
            .map_err(|_| CommentRepositoryError::connection("comment store lock poisoned"))
    }
}

impl Default for MemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn list(
        &self,
        module: Module,
        entity_id: u64,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut comments: Vec<Comment> = self
            .read()?
            .comments
            .values()
            .filter(|comment| comment.module() == module && comment.entity_id() == entity_id)
            .cloned()
            .collect();
        comments.sort_by_key(Comment::created_at);
        Ok(comments)
    }

    async fn find(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        Ok(self.read()?.comments.get(&id.value()).cloned())
    }

    async fn insert(
        &self,
        module: Module,
        entity_id: u64,
        author: UserId,
        text: String,
    ) -> Result<Comment, CommentRepositoryError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        let comment = Comment::try_new(
            CommentId::new(id),
            module,
            entity_id,
            author,
            text,
            Utc::now(),
        )
        .map_err(|err| CommentRepositoryError::query(err.to_string()))?;
        inner.next_id = id.saturating_add(1);
        inner.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: CommentId) -> Result<(), CommentRepositoryError> {
        let mut inner = self.write()?;
        inner
            .comments
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| CommentRepositoryError::missing(id.value()))
    }
}
