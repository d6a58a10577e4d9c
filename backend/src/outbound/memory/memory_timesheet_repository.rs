//! In-memory timesheet store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{TimesheetRepository, TimesheetRepositoryError};
use crate::domain::{TicketId, TimesheetEntry, TimesheetId, UserId};

struct Inner {
    entries: BTreeMap<u64, TimesheetEntry>,
    open_punches: BTreeSet<Uuid>,
    next_id: u64,
}

/// Timesheet repository backed by a process-local map.
pub struct MemoryTimesheetRepository {
    inner: RwLock<Inner>,
}

impl MemoryTimesheetRepository {
    /// An empty store; the first allocated identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: BTreeMap::new(),
                open_punches: BTreeSet::new(),
                next_id: 1,
            }),
        }
    }

    /// Store an entry, allocating its identifier.
    ///
    /// Synchronous seeding twin of the port's `insert`.
    pub fn put(&self, entry: TimesheetEntry) -> Result<TimesheetEntry, TimesheetRepositoryError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        let stored = TimesheetEntry::try_new(
            TimesheetId::new(id),
            entry.ticket_id(),
            *entry.user_id(),
            entry.kind(),
            entry.date(),
            entry.hours(),
            entry.description(),
        )
        .map_err(|err| TimesheetRepositoryError::query(err.to_string()))?;
        inner.next_id = id.saturating_add(1);
        inner.entries.insert(id, stored.clone());
        Ok(stored)
    }

    /// Mark or clear an open punch clock session for `user`.
    pub fn set_clocked(&self, user: &UserId, clocked: bool) -> Result<(), TimesheetRepositoryError> {
        let mut inner = self.write()?;
        if clocked {
            inner.open_punches.insert(*user.as_uuid());
        } else {
            inner.open_punches.remove(user.as_uuid());
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, TimesheetRepositoryError> {
        self.inner
            .read()
            .map_err(|_| TimesheetRepositoryError::connection("timesheet store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, TimesheetRepositoryError> {
        self.inner
            .write()
            .map_err(|_| TimesheetRepositoryError::connection("timesheet store lock poisoned"))
    }
}

impl Default for MemoryTimesheetRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimesheetRepository for MemoryTimesheetRepository {
    async fn entries_for_ticket(
        &self,
        ticket: TicketId,
    ) -> Result<Vec<TimesheetEntry>, TimesheetRepositoryError> {
        let mut entries: Vec<TimesheetEntry> = self
            .read()?
            .entries
            .values()
            .filter(|entry| entry.ticket_id() == ticket)
            .cloned()
            .collect();
        entries.sort_by_key(TimesheetEntry::date);
        Ok(entries)
    }

    async fn insert(
        &self,
        entry: TimesheetEntry,
    ) -> Result<TimesheetEntry, TimesheetRepositoryError> {
        self.put(entry)
    }

    async fn has_open_punch(&self, user: &UserId) -> Result<bool, TimesheetRepositoryError> {
        Ok(self.read()?.open_punches.contains(user.as_uuid()))
    }
}
