//! The fragment request lifecycle.

use std::sync::Arc;

use crate::action;
use crate::controller::{ActionOutcome, FragmentContext, FragmentController};
use crate::fault::Fault;
use crate::hooks::{HookBoard, LifecycleHook};
use crate::render::RenderFragment;
use crate::request::FragmentRequest;
use crate::response::FragmentResponse;
use crate::session::SessionStore;

/// Drives a [`FragmentController`] through the request lifecycle.
///
/// One pipeline serves every controller; it is built once at startup with
/// the renderer and any lifecycle listeners, then shared across workers.
///
/// [`FragmentPipeline::handle`] walks the stages in a fixed order:
///
/// 1. notify [`LifecycleHook::Begin`]
/// 2. notify [`LifecycleHook::BeforeInit`], then run controller `init`
/// 3. notify [`LifecycleHook::BeforeAction`]
/// 4. check the blueprint declares a view
/// 5. resolve the requested action against the declared set
/// 6. invoke the action
/// 7. render the view (unless the action finished with its own response)
/// 8. notify [`LifecycleHook::End`]
///
/// Any stage may abort with a [`Fault`]; an aborted lifecycle never reaches
/// the `End` hook.
pub struct FragmentPipeline {
    hooks: HookBoard,
    renderer: Arc<dyn RenderFragment>,
}

impl FragmentPipeline {
    /// A pipeline with no lifecycle listeners.
    #[must_use]
    pub fn new(renderer: Arc<dyn RenderFragment>) -> Self {
        Self::with_hooks(renderer, HookBoard::new())
    }

    /// A pipeline notifying the listeners on `hooks`.
    #[must_use]
    pub fn with_hooks(renderer: Arc<dyn RenderFragment>, hooks: HookBoard) -> Self {
        Self { hooks, renderer }
    }

    /// Handle one fragment request with `controller`.
    ///
    /// Headers the controller attached through [`FragmentContext`] are
    /// applied to the response last, whichever way the action produced it.
    pub async fn handle(
        &self,
        controller: &dyn FragmentController,
        request: &FragmentRequest,
        session: &mut (dyn SessionStore + '_),
    ) -> Result<FragmentResponse, Fault> {
        let blueprint = controller.blueprint();
        let name = blueprint.name();
        tracing::debug!(controller = name, "fragment lifecycle started");
        self.hooks.notify(LifecycleHook::Begin, name);

        let mut ctx = FragmentContext::new(request, session);
        self.hooks.notify(LifecycleHook::BeforeInit, name);
        controller.init(&mut ctx).await?;
        self.hooks.notify(LifecycleHook::BeforeAction, name);

        let view = blueprint.declared_view().ok_or_else(|| Fault::Configuration {
            controller: name.to_owned(),
        })?;
        let resolved = action::resolve(ctx.request().action(), blueprint.declared_actions())?;
        tracing::debug!(
            controller = name,
            action = %resolved.name(),
            fallback = resolved.is_fallback(),
            "action resolved"
        );

        let outcome = controller.invoke(resolved.name(), &mut ctx).await?;
        let mut response = match outcome {
            ActionOutcome::Render(data) => self.renderer.render(view, &data)?.into_response(),
            ActionOutcome::Finish(response) => response,
        };
        for (header, value) in ctx.headers() {
            response.set_header(header, value);
        }

        self.hooks.notify(LifecycleHook::End, name);
        tracing::debug!(controller = name, status = response.status(), "fragment lifecycle complete");
        Ok(response)
    }
}

impl std::fmt::Debug for FragmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentPipeline")
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::action::ActionName;
    use crate::controller::Blueprint;
    use crate::data::FragmentData;
    use crate::render::{FixtureRenderer, RenderFault, RenderedFragment, ViewName};
    use crate::response::HX_TRIGGER;
    use crate::session::MemorySession;

    type Log = Arc<Mutex<Vec<String>>>;

    fn log_line(log: &Log, line: impl Into<String>) {
        log.lock().expect("log lock").push(line.into());
    }

    fn log_lines(log: &Log) -> Vec<String> {
        log.lock().expect("log lock").clone()
    }

    struct Scripted {
        view: Option<&'static str>,
        actions: &'static [&'static str],
        fail_init: bool,
        log: Log,
    }

    impl Scripted {
        fn new(log: &Log) -> Self {
            Self {
                view: Some("widget.view"),
                actions: &["run", "saveTicket", "finish", "trigger"],
                fail_init: false,
                log: Arc::clone(log),
            }
        }
    }

    #[async_trait]
    impl FragmentController for Scripted {
        fn blueprint(&self) -> Blueprint {
            let mut blueprint = Blueprint::new("widget").actions(self.actions.iter().copied());
            if let Some(view) = self.view {
                blueprint = blueprint.view(view);
            }
            blueprint
        }

        async fn init(&self, _ctx: &mut FragmentContext<'_>) -> Result<(), Fault> {
            log_line(&self.log, "init");
            if self.fail_init {
                return Err(Fault::internal("init failed"));
            }
            Ok(())
        }

        async fn invoke(
            &self,
            action: &ActionName,
            ctx: &mut FragmentContext<'_>,
        ) -> Result<ActionOutcome, Fault> {
            log_line(&self.log, format!("invoke:{action}"));
            match action.as_str() {
                "finish" => Ok(ActionOutcome::Finish(FragmentResponse::with_status(
                    403,
                    "<p>denied</p>",
                ))),
                "trigger" => {
                    ctx.trigger("ticketUpdate");
                    Ok(ActionOutcome::Render(FragmentData::new()))
                }
                other => {
                    ctx.session().set("lastAction", json!(other));
                    let mut data = FragmentData::new();
                    data.assign("action", other);
                    Ok(ActionOutcome::Render(data))
                }
            }
        }
    }

    struct CountingRenderer {
        calls: Arc<AtomicUsize>,
        inner: FixtureRenderer,
    }

    impl RenderFragment for CountingRenderer {
        fn render(
            &self,
            view: &ViewName,
            data: &FragmentData,
        ) -> Result<RenderedFragment, RenderFault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.render(view, data)
        }
    }

    struct BrokenRenderer;

    impl RenderFragment for BrokenRenderer {
        fn render(
            &self,
            view: &ViewName,
            _data: &FragmentData,
        ) -> Result<RenderedFragment, RenderFault> {
            Err(RenderFault::UnknownView {
                view: view.to_string(),
            })
        }
    }

    fn observed_pipeline(log: &Log) -> FragmentPipeline {
        observed_pipeline_with(log, Arc::new(FixtureRenderer))
    }

    fn observed_pipeline_with(log: &Log, renderer: Arc<dyn RenderFragment>) -> FragmentPipeline {
        let mut hooks = HookBoard::new();
        let hook_log = Arc::clone(log);
        hooks.subscribe_all(move |event| log_line(&hook_log, format!("hook:{}", event.hook)));
        FragmentPipeline::with_hooks(renderer, hooks)
    }

    #[rstest]
    #[tokio::test]
    async fn walks_the_lifecycle_in_order() {
        let log: Log = Arc::default();
        let pipeline = observed_pipeline(&log);
        let controller = Scripted::new(&log);
        let request = FragmentRequest::new();
        let mut session = MemorySession::new();

        let response = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect("lifecycle completes");

        assert_eq!(response.status(), 200);
        assert!(response.html().contains("data-view=\"widget.view\""));
        assert_eq!(
            log_lines(&log),
            [
                "hook:begin",
                "hook:before_init",
                "init",
                "hook:before_action",
                "invoke:run",
                "hook:end",
            ]
        );
        assert_eq!(session.get("lastAction"), Some(json!("run")));
    }

    #[rstest]
    #[tokio::test]
    async fn requested_action_reaches_the_controller() {
        let log: Log = Arc::default();
        let pipeline = observed_pipeline(&log);
        let controller = Scripted::new(&log);
        let request = FragmentRequest::new().with_param("id", "save_ticket");
        let mut session = MemorySession::new();

        let response = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect("lifecycle completes");

        assert!(response.html().contains("saveTicket"));
        assert!(log_lines(&log).contains(&"invoke:saveTicket".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_view_aborts_before_the_action_runs() {
        let log: Log = Arc::default();
        let pipeline = observed_pipeline(&log);
        let mut controller = Scripted::new(&log);
        controller.view = None;
        let request = FragmentRequest::new();
        let mut session = MemorySession::new();

        let fault = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect_err("configuration fault");

        assert!(matches!(fault, Fault::Configuration { ref controller } if controller == "widget"));
        assert_eq!(
            log_lines(&log),
            ["hook:begin", "hook:before_init", "init", "hook:before_action"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unresolvable_action_aborts_without_the_end_hook() {
        let log: Log = Arc::default();
        let pipeline = observed_pipeline(&log);
        let mut controller = Scripted::new(&log);
        controller.actions = &["saveTicket"];
        let request = FragmentRequest::new().with_param("id", "unknownThing");
        let mut session = MemorySession::new();

        let fault = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect_err("dispatch fault");

        assert!(matches!(fault, Fault::Dispatch(_)));
        let lines = log_lines(&log);
        assert!(!lines.iter().any(|line| line.starts_with("invoke")));
        assert!(!lines.contains(&"hook:end".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_init_skips_action_and_end() {
        let log: Log = Arc::default();
        let pipeline = observed_pipeline(&log);
        let mut controller = Scripted::new(&log);
        controller.fail_init = true;
        let request = FragmentRequest::new();
        let mut session = MemorySession::new();

        let fault = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect_err("init fault");

        assert!(matches!(fault, Fault::Internal { .. }));
        assert_eq!(log_lines(&log), ["hook:begin", "hook:before_init", "init"]);
    }

    #[rstest]
    #[tokio::test]
    async fn finish_outcome_bypasses_the_renderer() {
        let log: Log = Arc::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let renderer = Arc::new(CountingRenderer {
            calls: Arc::clone(&calls),
            inner: FixtureRenderer,
        });
        let pipeline = observed_pipeline_with(&log, renderer);
        let controller = Scripted::new(&log);
        let request = FragmentRequest::new().with_param("id", "finish");
        let mut session = MemorySession::new();

        let response = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect("lifecycle completes");

        assert_eq!(response.status(), 403);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(log_lines(&log).contains(&"hook:end".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn context_headers_land_on_the_response() {
        let log: Log = Arc::default();
        let pipeline = observed_pipeline(&log);
        let controller = Scripted::new(&log);
        let request = FragmentRequest::new().with_param("id", "trigger");
        let mut session = MemorySession::new();

        let response = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect("lifecycle completes");

        assert_eq!(response.header_value(HX_TRIGGER), Some("ticketUpdate"));
    }

    #[rstest]
    #[tokio::test]
    async fn render_fault_aborts_without_the_end_hook() {
        let log: Log = Arc::default();
        let pipeline = observed_pipeline_with(&log, Arc::new(BrokenRenderer));
        let controller = Scripted::new(&log);
        let request = FragmentRequest::new();
        let mut session = MemorySession::new();

        let fault = pipeline
            .handle(&controller, &request, &mut session)
            .await
            .expect_err("render fault");

        assert!(matches!(
            fault,
            Fault::Render(RenderFault::UnknownView { ref view }) if view == "widget.view"
        ));
        assert!(!log_lines(&log).contains(&"hook:end".to_owned()));
    }
}
