//! In-memory ticket store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{Priority, ProjectId, SubtaskForm, Ticket, TicketId, TicketType};

struct Inner {
    tickets: BTreeMap<u64, Ticket>,
    next_id: u64,
}

/// Ticket repository backed by a process-local map.
pub struct MemoryTicketRepository {
    inner: RwLock<Inner>,
}

impl MemoryTicketRepository {
    /// An empty store; the first allocated identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tickets: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store a ticket under its own identifier.
    ///
    /// Seeding helper: later allocations continue above the highest
    /// identifier put in so far.
    pub fn put(&self, ticket: Ticket) -> Result<(), TicketRepositoryError> {
        let mut inner = self.write()?;
        let id = ticket.id().value();
        inner.next_id = inner.next_id.max(id.saturating_add(1));
        inner.tickets.insert(id, ticket);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, TicketRepositoryError> {
        self.inner
            .read()
            .map_err(|_| TicketRepositoryError::connection("ticket store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, TicketRepositoryError> {
        self.inner
            .write()
            .map_err(|_| TicketRepositoryError::connection("ticket store lock poisoned"))
    }
}

impl Default for MemoryTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn find(&self, id: TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(self.read()?.tickets.get(&id.value()).cloned())
    }

    async fn list_for_project(
        &self,
        project: ProjectId,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(self
            .read()?
            .tickets
            .values()
            .filter(|ticket| ticket.project_id() == project)
            .cloned()
            .collect())
    }

    async fn children_of(&self, parent: TicketId) -> Result<Vec<Ticket>, TicketRepositoryError> {
        Ok(self
            .read()?
            .tickets
            .values()
            .filter(|ticket| ticket.parent() == Some(parent))
            .cloned()
            .collect())
    }

    async fn save(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut inner = self.write()?;
        let id = ticket.id().value();
        if !inner.tickets.contains_key(&id) {
            return Err(TicketRepositoryError::missing(id));
        }
        inner.tickets.insert(id, ticket.clone());
        Ok(())
    }

    async fn insert_subtask(
        &self,
        project: ProjectId,
        parent: TicketId,
        form: SubtaskForm,
    ) -> Result<Ticket, TicketRepositoryError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        let ticket = Ticket::try_new(
            TicketId::new(id),
            project,
            Some(parent),
            form.headline,
            form.description,
            form.status,
            TicketType::Task,
            Priority::Medium,
            None,
            0.0,
            None,
        )
        .map_err(|err| TicketRepositoryError::query(err.to_string()))?;
        inner.next_id = id.saturating_add(1);
        inner.tickets.insert(id, ticket.clone());
        Ok(ticket)
    }

    async fn delete(&self, id: TicketId) -> Result<(), TicketRepositoryError> {
        let mut inner = self.write()?;
        inner
            .tickets
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| TicketRepositoryError::missing(id.value()))
    }
}
