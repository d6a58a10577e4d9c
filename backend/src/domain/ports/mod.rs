//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod calendar_repository;
mod calendar_service;
mod comment_repository;
mod comment_service;
mod file_repository;
mod file_service;
mod login_service;
mod ownership;
mod project_repository;
mod project_service;
mod ticket_repository;
mod ticket_service;
mod timesheet_repository;
mod timesheet_service;
mod user_directory;
mod users_query;

#[cfg(test)]
pub use calendar_repository::MockCalendarRepository;
pub use calendar_repository::{
    CalendarRepository, CalendarRepositoryError, FixtureCalendarRepository,
};
#[cfg(test)]
pub use calendar_service::MockCalendarService;
pub use calendar_service::{CalendarService, FixtureCalendarService};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError, FixtureCommentRepository};
#[cfg(test)]
pub use comment_service::MockCommentService;
pub use comment_service::{CommentService, FixtureCommentService};
#[cfg(test)]
pub use file_repository::MockFileRepository;
pub use file_repository::{FileRepository, FileRepositoryError, FixtureFileRepository};
#[cfg(test)]
pub use file_service::MockFileService;
pub use file_service::{FileService, FixtureFileService};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use ownership::MockOwnershipLookup;
pub use ownership::{FixtureOwnershipLookup, OwnershipLookup, OwnershipLookupError};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{FixtureProjectRepository, ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use project_service::MockProjectService;
pub use project_service::{FixtureProjectService, ProjectService};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{FixtureTicketRepository, TicketRepository, TicketRepositoryError};
#[cfg(test)]
pub use ticket_service::MockTicketService;
pub use ticket_service::{FixtureTicketService, TicketService};
#[cfg(test)]
pub use timesheet_repository::MockTimesheetRepository;
pub use timesheet_repository::{
    FixtureTimesheetRepository, TimesheetRepository, TimesheetRepositoryError,
};
#[cfg(test)]
pub use timesheet_service::MockTimesheetService;
pub use timesheet_service::{FixtureTimesheetService, TimeLog, TimesheetService};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{
    CredentialRecord, FixtureUserDirectory, UserDirectory, UserDirectoryError,
};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{FixtureUsersQuery, UsersQuery};
