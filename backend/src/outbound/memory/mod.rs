//! Process-local repository adapters.
//!
//! Purpose: give every driven port a working implementation without a
//! database, for development servers, integration tests, and the demo
//! deployment. Each store keeps its records in a `BTreeMap` behind an
//! `RwLock`; identifier allocation lives with the store, matching the
//! contract the ports promise.
//!
//! A poisoned lock is reported through the port's `Connection` error
//! variant: the store is unreachable, which is exactly what that variant
//! means.

mod demo_seed;
mod memory_calendar_repository;
mod memory_comment_repository;
mod memory_file_repository;
mod memory_project_repository;
mod memory_ticket_repository;
mod memory_timesheet_repository;
mod memory_user_directory;

pub use demo_seed::{DEMO_PASSWORD, DEMO_PROJECT_ID, DemoSeed, DemoSeedError};
pub use memory_calendar_repository::MemoryCalendarRepository;
pub use memory_comment_repository::MemoryCommentRepository;
pub use memory_file_repository::MemoryFileRepository;
pub use memory_project_repository::MemoryProjectRepository;
pub use memory_ticket_repository::MemoryTicketRepository;
pub use memory_timesheet_repository::MemoryTimesheetRepository;
pub use memory_user_directory::MemoryUserDirectory;
