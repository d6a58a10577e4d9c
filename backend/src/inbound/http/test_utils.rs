//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use fragments::FixtureRenderer;

use crate::domain::ProjectId;
use crate::domain::ports::{
    FixtureCalendarService, FixtureCommentService, FixtureFileService, FixtureLoginService,
    FixtureProjectService, FixtureTicketService, FixtureTimesheetService, FixtureUsersQuery,
};

use super::state::{FragmentStack, HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// An [`HttpState`] wired to fixture ports, with no controllers registered.
pub fn fixture_http_state() -> HttpState {
    fixture_http_state_with(FragmentStack::new(Arc::new(FixtureRenderer)))
}

/// Same as [`fixture_http_state`], with a caller-supplied fragment stack.
pub fn fixture_http_state_with(stack: FragmentStack) -> HttpState {
    let ports = HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        users: Arc::new(FixtureUsersQuery),
        tickets: Arc::new(FixtureTicketService),
        comments: Arc::new(FixtureCommentService),
        files: Arc::new(FixtureFileService),
        timesheets: Arc::new(FixtureTimesheetService),
        calendars: Arc::new(FixtureCalendarService),
        projects: Arc::new(FixtureProjectService),
    };
    HttpState::new(ports, stack, ProjectId::new(1))
}
