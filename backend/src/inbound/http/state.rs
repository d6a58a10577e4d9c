//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O. The
//! state also carries the fragment machinery: the pipeline, the renderer,
//! the fault report registry, and the registered fragment controllers.

use std::collections::BTreeMap;
use std::sync::Arc;

use fragments::{FragmentController, FragmentPipeline, RenderFragment, ReportRegistry};

use crate::domain::ProjectId;
use crate::domain::ports::{
    CalendarService, CommentService, FileService, LoginService, ProjectService, TicketService,
    TimesheetService, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub tickets: Arc<dyn TicketService>,
    pub comments: Arc<dyn CommentService>,
    pub files: Arc<dyn FileService>,
    pub timesheets: Arc<dyn TimesheetService>,
    pub calendars: Arc<dyn CalendarService>,
    pub projects: Arc<dyn ProjectService>,
}

/// Fragment machinery shared by every fragment endpoint.
#[derive(Clone)]
pub struct FragmentStack {
    pub pipeline: Arc<FragmentPipeline>,
    pub renderer: Arc<dyn RenderFragment>,
    pub reports: Arc<ReportRegistry>,
}

impl FragmentStack {
    /// A stack over `renderer` with an empty report registry.
    #[must_use]
    pub fn new(renderer: Arc<dyn RenderFragment>) -> Self {
        Self::with_reports(renderer, ReportRegistry::new())
    }

    /// A stack over `renderer` dispatching fatal faults through `reports`.
    ///
    /// Report callbacks must be registered before the registry is handed
    /// over; the stack shares it immutably across workers.
    #[must_use]
    pub fn with_reports(renderer: Arc<dyn RenderFragment>, reports: ReportRegistry) -> Self {
        Self {
            pipeline: Arc::new(FragmentPipeline::new(Arc::clone(&renderer))),
            renderer,
            reports: Arc::new(reports),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub tickets: Arc<dyn TicketService>,
    pub comments: Arc<dyn CommentService>,
    pub files: Arc<dyn FileService>,
    pub timesheets: Arc<dyn TimesheetService>,
    pub calendars: Arc<dyn CalendarService>,
    pub projects: Arc<dyn ProjectService>,
    pub pipeline: Arc<FragmentPipeline>,
    pub renderer: Arc<dyn RenderFragment>,
    pub reports: Arc<ReportRegistry>,
    pub default_project: ProjectId,
    controllers: BTreeMap<&'static str, Arc<dyn FragmentController>>,
}

impl HttpState {
    /// Construct state from a ports bundle and the fragment stack.
    ///
    /// Fragment controllers are registered separately via
    /// [`HttpState::register_controller`], keeping this module free of
    /// controller wiring.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ProjectId;
    /// use backend::domain::ports::{
    ///     FixtureCalendarService, FixtureCommentService, FixtureFileService,
    ///     FixtureLoginService, FixtureProjectService, FixtureTicketService,
    ///     FixtureTimesheetService, FixtureUsersQuery,
    /// };
    /// use backend::inbound::http::state::{FragmentStack, HttpState, HttpStatePorts};
    /// use fragments::FixtureRenderer;
    ///
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     users: Arc::new(FixtureUsersQuery),
    ///     tickets: Arc::new(FixtureTicketService),
    ///     comments: Arc::new(FixtureCommentService),
    ///     files: Arc::new(FixtureFileService),
    ///     timesheets: Arc::new(FixtureTimesheetService),
    ///     calendars: Arc::new(FixtureCalendarService),
    ///     projects: Arc::new(FixtureProjectService),
    /// };
    /// let stack = FragmentStack::new(Arc::new(FixtureRenderer));
    /// let state = HttpState::new(ports, stack, ProjectId::new(1));
    /// assert!(state.controller("ticket-modal").is_none());
    /// ```
    #[must_use]
    pub fn new(
        ports: HttpStatePorts,
        fragments: FragmentStack,
        default_project: ProjectId,
    ) -> Self {
        let HttpStatePorts {
            login,
            users,
            tickets,
            comments,
            files,
            timesheets,
            calendars,
            projects,
        } = ports;
        let FragmentStack {
            pipeline,
            renderer,
            reports,
        } = fragments;
        Self {
            login,
            users,
            tickets,
            comments,
            files,
            timesheets,
            calendars,
            projects,
            pipeline,
            renderer,
            reports,
            default_project,
            controllers: BTreeMap::new(),
        }
    }

    /// Register a fragment controller under its blueprint name.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_controller(&mut self, controller: Arc<dyn FragmentController>) {
        let name = controller.blueprint().name();
        self.controllers.insert(name, controller);
    }

    /// Look up a registered fragment controller by name.
    #[must_use]
    pub fn controller(&self, name: &str) -> Option<Arc<dyn FragmentController>> {
        self.controllers.get(name).map(Arc::clone)
    }

    /// Names of the registered fragment controllers, in lexical order.
    pub fn controller_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.controllers.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use fragments::{
        ActionName, ActionOutcome, Blueprint, Fault, FragmentContext, FragmentData,
    };
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::fixture_http_state;

    struct NamedController(&'static str);

    #[async_trait]
    impl FragmentController for NamedController {
        fn blueprint(&self) -> Blueprint {
            Blueprint::new(self.0).view("fixture.view").actions(["run"])
        }

        async fn invoke(
            &self,
            _action: &ActionName,
            _ctx: &mut FragmentContext<'_>,
        ) -> Result<ActionOutcome, Fault> {
            Ok(ActionOutcome::Render(FragmentData::new()))
        }
    }

    #[rstest]
    fn controllers_are_looked_up_by_blueprint_name() {
        let mut state = fixture_http_state();
        state.register_controller(Arc::new(NamedController("ticket-modal")));
        state.register_controller(Arc::new(NamedController("calendar-panel")));

        assert!(state.controller("ticket-modal").is_some());
        assert!(state.controller("calendar-panel").is_some());
        assert!(state.controller("unknown-panel").is_none());
        let names: Vec<_> = state.controller_names().collect();
        assert_eq!(names, ["calendar-panel", "ticket-modal"]);
    }

    #[rstest]
    fn later_registration_replaces_earlier() {
        let mut state = fixture_http_state();
        let replaced: Arc<dyn FragmentController> = Arc::new(NamedController("ticket-modal"));
        let kept: Arc<dyn FragmentController> = Arc::new(NamedController("ticket-modal"));
        state.register_controller(Arc::clone(&replaced));
        state.register_controller(Arc::clone(&kept));

        let registered = state.controller("ticket-modal").expect("registered");
        assert!(Arc::ptr_eq(&registered, &kept));
        assert!(!Arc::ptr_eq(&registered, &replaced));
    }
}
