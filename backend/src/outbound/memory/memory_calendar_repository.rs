//! In-memory calendar event store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{
    CalendarRepository, CalendarRepositoryError, OwnershipLookup, OwnershipLookupError,
};
use crate::domain::{CalendarEvent, EventId, UserId};

struct Inner {
    events: BTreeMap<u64, CalendarEvent>,
    next_id: u64,
}

/// Calendar repository backed by a process-local map.
///
/// Doubles as the ownership lookup the mutation gate consults, so gate and
/// repository can never disagree about who owns an event.
pub struct MemoryCalendarRepository {
    inner: RwLock<Inner>,
}

impl MemoryCalendarRepository {
    /// An empty store; the first allocated identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                events: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store an event under its own identifier.
    pub fn put(&self, event: CalendarEvent) -> Result<(), CalendarRepositoryError> {
        let mut inner = self.write()?;
        let id = event.id().value();
        inner.next_id = inner.next_id.max(id.saturating_add(1));
        inner.events.insert(id, event);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, CalendarRepositoryError> {
        self.inner
            .read()
            .map_err(|_| CalendarRepositoryError::connection("calendar store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, CalendarRepositoryError> {
        self.inner
            .write()
            .map_err(|_| CalendarRepositoryError::connection("calendar store lock poisoned"))
    }
}

impl Default for MemoryCalendarRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarRepository for MemoryCalendarRepository {
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<CalendarEvent>, CalendarRepositoryError> {
        let mut events: Vec<CalendarEvent> = self
            .read()?
            .events
            .values()
            .filter(|event| event.user_id() == user)
            .cloned()
            .collect();
        events.sort_by_key(CalendarEvent::date_from);
        Ok(events)
    }

    async fn find(&self, id: EventId) -> Result<Option<CalendarEvent>, CalendarRepositoryError> {
        Ok(self.read()?.events.get(&id.value()).cloned())
    }

    async fn insert(
        &self,
        event: CalendarEvent,
    ) -> Result<CalendarEvent, CalendarRepositoryError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        let stored = CalendarEvent::try_new(
            EventId::new(id),
            *event.user_id(),
            event.description(),
            event.date_from(),
            event.date_to(),
            event.all_day(),
        )
        .map_err(|err| CalendarRepositoryError::query(err.to_string()))?;
        inner.next_id = id.saturating_add(1);
        inner.events.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, event: &CalendarEvent) -> Result<(), CalendarRepositoryError> {
        let mut inner = self.write()?;
        let id = event.id().value();
        if !inner.events.contains_key(&id) {
            return Err(CalendarRepositoryError::missing(id));
        }
        inner.events.insert(id, event.clone());
        Ok(())
    }

    async fn delete(&self, id: EventId) -> Result<(), CalendarRepositoryError> {
        let mut inner = self.write()?;
        inner
            .events
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| CalendarRepositoryError::missing(id.value()))
    }
}

#[async_trait]
impl OwnershipLookup<EventId> for MemoryCalendarRepository {
    async fn owner_of(&self, resource: EventId) -> Result<Option<UserId>, OwnershipLookupError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| OwnershipLookupError::connection("calendar store lock poisoned"))?;
        Ok(inner
            .events
            .get(&resource.value())
            .map(|event| *event.user_id()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::NaiveDate;

    fn event(id: u64, owner: UserId, day: u32) -> CalendarEvent {
        let start = NaiveDate::from_ymd_opt(2026, 9, day)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time");
        CalendarEvent::try_new(
            EventId::new(id),
            owner,
            format!("Standup {day}"),
            Some(start),
            None,
            false,
        )
        .expect("valid event")
    }

    #[tokio::test]
    async fn listings_are_scoped_and_sorted_by_start() {
        let repo = MemoryCalendarRepository::new();
        let alice = UserId::random();
        let bob = UserId::random();
        repo.put(event(1, alice, 20)).expect("put");
        repo.put(event(2, alice, 3)).expect("put");
        repo.put(event(3, bob, 1)).expect("put");

        let listed = repo.list_for_user(&alice).await.expect("list");
        let ids: Vec<EventId> = listed.iter().map(CalendarEvent::id).collect();
        assert_eq!(ids, [EventId::new(2), EventId::new(1)]);
    }

    #[tokio::test]
    async fn the_ownership_lookup_answers_from_the_same_records() {
        let repo = MemoryCalendarRepository::new();
        let owner = UserId::random();
        repo.put(event(7, owner, 5)).expect("put");

        let found = repo.owner_of(EventId::new(7)).await.expect("lookup");
        assert_eq!(found, Some(owner));
        let vanished = repo.owner_of(EventId::new(8)).await.expect("lookup");
        assert_eq!(vanished, None);
    }

    #[tokio::test]
    async fn inserts_allocate_identifiers_above_seeded_ones() {
        let repo = MemoryCalendarRepository::new();
        let owner = UserId::random();
        repo.put(event(5, owner, 1)).expect("put");

        let stored = repo.insert(event(0, owner, 2)).await.expect("insert");
        assert_eq!(stored.id(), EventId::new(6));
    }
}
