//! The fragment controller contract.

use async_trait::async_trait;

use crate::action::{ActionName, ActionSet};
use crate::data::FragmentData;
use crate::fault::Fault;
use crate::render::ViewName;
use crate::request::FragmentRequest;
use crate::response::{FragmentResponse, HX_TRIGGER};
use crate::session::SessionStore;

/// Static description of a controller: its name, the view it renders, and
/// the actions it declares.
///
/// A controller without a view is misconfigured; the pipeline refuses to
/// execute it. Declared action names are normalised on the way in, so a
/// blueprint may spell them however its author likes.
#[derive(Debug, Clone)]
pub struct Blueprint {
    name: &'static str,
    view: Option<ViewName>,
    actions: ActionSet,
}

impl Blueprint {
    /// Start a blueprint for the controller called `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            view: None,
            actions: ActionSet::default(),
        }
    }

    /// Declare the view this controller renders.
    #[must_use]
    pub fn view(mut self, view: impl Into<ViewName>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Declare the actions this controller answers.
    #[must_use]
    pub fn actions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.actions = ActionSet::new(names);
        self
    }

    /// The controller's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared view, when one was declared.
    #[must_use]
    pub fn declared_view(&self) -> Option<&ViewName> {
        self.view.as_ref()
    }

    /// The declared action set.
    #[must_use]
    pub fn declared_actions(&self) -> &ActionSet {
        &self.actions
    }
}

/// Request-scoped state handed to a controller.
///
/// Bundles the request parameters, the caller's session, and the response
/// headers the controller wants attached to whatever the lifecycle finally
/// answers with.
pub struct FragmentContext<'req> {
    request: &'req FragmentRequest,
    session: &'req mut (dyn SessionStore + 'req),
    headers: Vec<(String, String)>,
}

impl<'req> FragmentContext<'req> {
    /// Build a context over a request and its session.
    pub fn new(
        request: &'req FragmentRequest,
        session: &'req mut (dyn SessionStore + 'req),
    ) -> Self {
        Self {
            request,
            session,
            headers: Vec::new(),
        }
    }

    /// The request being handled.
    #[must_use]
    pub fn request(&self) -> &FragmentRequest {
        self.request
    }

    /// The caller's session.
    pub fn session(&mut self) -> &mut dyn SessionStore {
        self.session
    }

    /// Attach a response header, replacing any earlier value under the same
    /// name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            existing.1 = value;
        } else {
            self.headers.push((name, value));
        }
    }

    /// Ask the client to re-broadcast `event` once the fragment lands.
    ///
    /// Multiple triggers accumulate into a comma-separated header value.
    pub fn trigger(&mut self, event: &str) {
        let value = match self
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(HX_TRIGGER))
        {
            Some((_, existing)) => format!("{existing}, {event}"),
            None => event.to_owned(),
        };
        self.set_header(HX_TRIGGER, value);
    }

    /// Headers the controller asked to attach, in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Debug for FragmentContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentContext")
            .field("request", &self.request)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// What an action produced.
#[derive(Debug)]
pub enum ActionOutcome {
    /// Assignments for the blueprint's view; the pipeline renders them.
    Render(FragmentData),
    /// A complete response; the pipeline skips rendering. Used for error
    /// fragments and redirects.
    Finish(FragmentResponse),
}

/// A controller serving one fragment endpoint.
///
/// Implementations are constructed with their collaborators up front and
/// kept alive for the lifetime of the server; per-request work happens in
/// [`FragmentController::init`] and [`FragmentController::invoke`], both of
/// which receive the request through a [`FragmentContext`].
#[async_trait]
pub trait FragmentController: Send + Sync {
    /// The controller's static description.
    fn blueprint(&self) -> Blueprint;

    /// Per-request initialisation, run before the action is resolved.
    ///
    /// The default does nothing.
    async fn init(&self, ctx: &mut FragmentContext<'_>) -> Result<(), Fault> {
        let _ = ctx;
        Ok(())
    }

    /// Execute a resolved action.
    ///
    /// `action` is always one of the blueprint's declared names.
    async fn invoke(
        &self,
        action: &ActionName,
        ctx: &mut FragmentContext<'_>,
    ) -> Result<ActionOutcome, Fault>;
}
