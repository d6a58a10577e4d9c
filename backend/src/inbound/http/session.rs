//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting the signed-in actor, and a
//! set of key-level helpers shared with fragment controllers, which see the
//! session only through the [`SessionStore`] port. The Actix session itself
//! never crosses into the pipeline: dispatch snapshots it into a
//! [`MemorySession`], runs the controller against the copy and writes the
//! mutated entries back afterwards.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use fragments::{MemorySession, SessionStore};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::domain::{Actor, Error, ProjectId};

pub(crate) const ACTOR_KEY: &str = "actor";
pub(crate) const CURRENT_PROJECT_KEY: &str = "currentProject";
pub(crate) const LAST_PAGE_KEY: &str = "lastPage";
pub(crate) const NOTIFICATIONS_KEY: &str = "notifications";

/// Board the client is sent back to when no page was recorded yet.
pub(crate) const DEFAULT_LAST_PAGE: &str = "/tickets/showKanban";

/// Severity of a flash notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// The mutation succeeded.
    Success,
    /// The mutation failed in a way the user can act on.
    Error,
}

/// One-shot message staged by a mutation and drained into the next fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    level: NotificationLevel,
    message: String,
}

impl Notification {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// A failure notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Severity shown to the user.
    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The signed-in actor, or `None` when the entry is missing or unreadable.
pub(crate) fn current_actor(session: &dyn SessionStore) -> Option<Actor> {
    let value = session.get(ACTOR_KEY)?;
    match serde_json::from_value(value) {
        Ok(actor) => Some(actor),
        Err(error) => {
            warn!(%error, "invalid actor in session; treating as signed out");
            None
        }
    }
}

/// The project the actor is working in, falling back to the configured default.
pub(crate) fn current_project(session: &dyn SessionStore, default: ProjectId) -> ProjectId {
    session
        .get(CURRENT_PROJECT_KEY)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or(default)
}

/// Record `project` as the actor's current project.
pub(crate) fn switch_project(session: &mut dyn SessionStore, project: ProjectId) {
    session.set(CURRENT_PROJECT_KEY, json!(project));
}

/// The page the client returns to after closing a modal.
///
/// Seeds the session with [`DEFAULT_LAST_PAGE`] on first use so later
/// requests observe the same answer.
pub(crate) fn last_page_or_default(session: &mut dyn SessionStore) -> String {
    if let Some(Value::String(page)) = session.get(LAST_PAGE_KEY) {
        return page;
    }
    session.set(LAST_PAGE_KEY, json!(DEFAULT_LAST_PAGE));
    DEFAULT_LAST_PAGE.to_owned()
}

/// Stage a flash notification for the next rendered fragment.
pub(crate) fn push_notification(session: &mut dyn SessionStore, notification: Notification) {
    let mut pending = session
        .get(NOTIFICATIONS_KEY)
        .and_then(|value| serde_json::from_value::<Vec<Notification>>(value).ok())
        .unwrap_or_default();
    pending.push(notification);
    session.set(NOTIFICATIONS_KEY, json!(pending));
}

/// Remove and return every staged notification.
pub(crate) fn drain_notifications(session: &mut dyn SessionStore) -> Vec<Notification> {
    session
        .remove(NOTIFICATIONS_KEY)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated actor in the session cookie.
    pub fn persist_actor(&self, actor: Actor) -> Result<(), Error> {
        self.0
            .insert(ACTOR_KEY, actor)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Record the project the actor starts out in.
    pub fn persist_project(&self, project: ProjectId) -> Result<(), Error> {
        self.0
            .insert(CURRENT_PROJECT_KEY, project)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the signed-in actor from the session, if present.
    ///
    /// A tampered or unreadable entry is treated as signed out rather than
    /// surfaced as a server failure.
    pub fn actor(&self) -> Result<Option<Actor>, Error> {
        match self.0.get::<Actor>(ACTOR_KEY) {
            Ok(actor) => Ok(actor),
            Err(error) => {
                warn!("invalid actor in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Require an authenticated actor or return `401 Unauthorized`.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        self.actor()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session entry and invalidate the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Snapshot the cookie session into a store the fragment pipeline can
    /// mutate.
    ///
    /// [`SessionStore`] requires `Send` while the Actix session is pinned to
    /// its worker, so the pipeline runs against a copy. Entries that are not
    /// valid JSON are skipped rather than failing the request.
    pub fn fragment_session(&self) -> MemorySession {
        MemorySession::from_entries(self.0.entries().iter().filter_map(|(key, raw)| {
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => Some((key.clone(), value)),
                Err(error) => {
                    warn!(%error, key, "unreadable session entry skipped");
                    None
                }
            }
        }))
    }

    /// Write a mutated fragment store back onto the cookie session.
    ///
    /// Keys the pipeline removed are removed here too, so drained entries do
    /// not resurface on the next request.
    pub fn apply_fragment_session(&self, store: &MemorySession) {
        let stale: Vec<String> = self
            .0
            .entries()
            .keys()
            .filter(|key| store.get(key).is_none())
            .cloned()
            .collect();
        for key in &stale {
            self.0.remove(key);
        }
        for (key, value) in store.entries() {
            if let Err(error) = self.0.insert(key, value) {
                warn!(%error, key, "failed to stage session entry");
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
