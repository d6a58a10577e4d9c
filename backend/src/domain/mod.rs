//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities behind the fragment
//! controllers and the services that implement the driving ports over the
//! driven ones. Keep types immutable where practical and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Layout:
//! - entity modules (`tickets`, `comments`, `files`, `timesheets`,
//!   `calendar`, `projects`, `users`, `auth`) own validation;
//! - `ports` holds the hexagonal boundary traits;
//! - `*_service` modules implement driving ports over driven ones;
//! - `authorization` holds the ownership gate used by calendar mutations;
//! - `error` and `trace_id` carry the error payload and request
//!   correlation types shared with the inbound layer.

pub mod ports;

pub mod auth;
pub mod authorization;
pub mod calendar;
pub mod calendars_service;
pub mod comments;
pub mod comments_service;
pub mod error;
pub mod files;
pub mod files_service;
pub mod projects;
pub mod projects_service;
pub mod tickets;
pub mod tickets_service;
pub mod timesheets;
pub mod timesheets_service;
pub mod trace_id;
pub mod users;
pub mod users_service;

pub use self::auth::{
    Actor, LoginCredentials, LoginValidationError, Role, password_digest,
};
pub use self::authorization::MutationGate;
pub use self::calendar::{
    CalendarEvent, CalendarValidationError, EventEdit, EventId, EventPatch, checkbox_checked,
    combine_date_time,
};
pub use self::calendars_service::GatedCalendarService;
pub use self::comments::{Comment, CommentId, CommentValidationError, Module};
pub use self::comments_service::RepositoryCommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::files::{FileId, FileValidationError, IMAGE_EXTENSIONS, StoredFile};
pub use self::files_service::RepositoryFileService;
pub use self::projects::{Project, ProjectId, ProjectValidationError};
pub use self::projects_service::DirectoryProjectService;
pub use self::tickets::{
    EFFORT_LABELS, Priority, SubtaskForm, Ticket, TicketId, TicketStatus, TicketType,
    TicketUpdate, TicketValidationError, descendants_of, effort_label,
};
pub use self::tickets_service::RepositoryTicketService;
pub use self::timesheets::{
    HourKind, TimesheetEntry, TimesheetId, TimesheetValidationError, parse_hours,
};
pub use self::timesheets_service::ClockedTimesheetService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId, current_trace_id, with_trace_id};
pub use self::users::{DisplayName, User, UserId, UserValidationError, Username};
pub use self::users_service::DirectoryUsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
