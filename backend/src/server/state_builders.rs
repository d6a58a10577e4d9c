//! Builders assembling the HTTP state from domain services and adapters.
//!
//! The memory stores stand in for the relational database; every domain
//! service runs over them through its port. Swapping in database-backed
//! adapters later only touches this module.

use std::sync::Arc;

use fragments::{FaultKind, ReportRegistry, Verdict};
use mockable::DefaultClock;
use tracing::{error, info};

use crate::domain::ProjectId;
use crate::domain::{
    ClockedTimesheetService, DirectoryProjectService, DirectoryUsersService, GatedCalendarService,
    RepositoryCommentService, RepositoryFileService, RepositoryTicketService,
};
use crate::inbound::http::calendar_panel::CalendarPanelController;
use crate::inbound::http::state::{FragmentStack, HttpState, HttpStatePorts};
use crate::inbound::http::ticket_modal::{TicketModalController, TicketModalDeps};
use crate::outbound::memory::{
    DemoSeed, DemoSeedError, MemoryCalendarRepository, MemoryCommentRepository,
    MemoryFileRepository, MemoryProjectRepository, MemoryTicketRepository,
    MemoryTimesheetRepository, MemoryUserDirectory,
};
use crate::outbound::render::HtmlRenderer;

struct Stores {
    tickets: Arc<MemoryTicketRepository>,
    comments: Arc<MemoryCommentRepository>,
    files: Arc<MemoryFileRepository>,
    timesheets: Arc<MemoryTimesheetRepository>,
    calendars: Arc<MemoryCalendarRepository>,
    projects: Arc<MemoryProjectRepository>,
    directory: Arc<MemoryUserDirectory>,
}

fn provision_stores(demo_data: bool) -> Result<Stores, DemoSeedError> {
    if demo_data {
        let seed = DemoSeed::provision()?;
        info!(
            admin = %seed.erna.username(),
            editor = %seed.theo.username(),
            "demo workspace provisioned"
        );
        Ok(Stores {
            tickets: seed.tickets,
            comments: seed.comments,
            files: seed.files,
            timesheets: seed.timesheets,
            calendars: seed.calendars,
            projects: seed.projects,
            directory: seed.directory,
        })
    } else {
        Ok(Stores {
            tickets: Arc::new(MemoryTicketRepository::new()),
            comments: Arc::new(MemoryCommentRepository::new()),
            files: Arc::new(MemoryFileRepository::new()),
            timesheets: Arc::new(MemoryTimesheetRepository::new()),
            calendars: Arc::new(MemoryCalendarRepository::new()),
            projects: Arc::new(MemoryProjectRepository::new()),
            directory: Arc::new(MemoryUserDirectory::new()),
        })
    }
}

/// Default report wiring: server-side faults are logged here and swallowed
/// so the dispatcher's fallback reporting stays quiet; dispatch faults are
/// the client's doing and stay with the dispatcher.
fn default_reports() -> ReportRegistry {
    let mut reports = ReportRegistry::new();
    let _server_reporter = reports.register(FaultKind::Server, |fault| {
        error!(kind = %fault.kind().label(), %fault, "fragment lifecycle fault");
        Verdict::Swallow
    });
    reports
}

/// Build the HTTP state over memory stores, with both fragment controllers
/// registered.
///
/// # Errors
/// Fails when demo provisioning is enabled and the built-in seed records
/// cannot be constructed.
pub fn build_http_state(
    default_project: ProjectId,
    demo_data: bool,
) -> Result<HttpState, DemoSeedError> {
    let stores = provision_stores(demo_data)?;
    let clock = Arc::new(DefaultClock);

    let users = Arc::new(DirectoryUsersService::new(Arc::clone(&stores.directory)));
    let tickets = Arc::new(RepositoryTicketService::new(Arc::clone(&stores.tickets)));
    let comments = Arc::new(RepositoryCommentService::new(Arc::clone(&stores.comments)));
    let files = Arc::new(RepositoryFileService::new(Arc::clone(&stores.files)));
    let timesheets = Arc::new(ClockedTimesheetService::new(
        Arc::clone(&stores.timesheets),
        clock.clone(),
    ));
    let calendars = Arc::new(GatedCalendarService::new(
        Arc::clone(&stores.calendars),
        Arc::clone(&stores.calendars),
    ));
    let projects = Arc::new(DirectoryProjectService::new(
        Arc::clone(&stores.projects),
        Arc::clone(&stores.directory),
    ));

    let renderer = Arc::new(HtmlRenderer);
    let ports = HttpStatePorts {
        login: users.clone(),
        users: users.clone(),
        tickets: tickets.clone(),
        comments: comments.clone(),
        files: files.clone(),
        timesheets: timesheets.clone(),
        calendars: calendars.clone(),
        projects: projects.clone(),
    };
    let stack = FragmentStack::with_reports(renderer.clone(), default_reports());
    let mut state = HttpState::new(ports, stack, default_project);

    state.register_controller(Arc::new(TicketModalController::new(
        TicketModalDeps {
            tickets,
            comments,
            files,
            timesheets,
            projects,
            users,
            renderer: renderer.clone(),
            clock,
        },
        default_project,
    )));
    state.register_controller(Arc::new(CalendarPanelController::new(calendars, renderer)));

    Ok(state)
}
