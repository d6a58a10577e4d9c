//! Registry of fault report callbacks.
//!
//! Observers register a callback together with the [`FaultKind`]s they care
//! about. When a fatal fault is dispatched, matching callbacks run in
//! registration order; each returns a [`Verdict`] deciding whether the fault
//! keeps propagating to default reporting (the structured log emitted by the
//! transport's error adapter). A callback registered with
//! [`ReportHandle::stop`] halts the chain after it runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::fault::{Fault, FaultKind};

/// What a report callback wants done with the fault after it has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep offering the fault to later callbacks and default reporting.
    Share,
    /// The callback owns the fault; skip later callbacks and default
    /// reporting.
    Swallow,
}

/// The set of [`FaultKind`]s a callback subscribes to.
#[derive(Debug, Clone)]
pub struct Interest {
    kinds: Vec<FaultKind>,
}

impl Interest {
    /// Whether any subscribed kind covers `kind`.
    #[must_use]
    pub fn covers(&self, kind: FaultKind) -> bool {
        self.kinds.iter().any(|subscribed| subscribed.matches(kind))
    }
}

impl From<FaultKind> for Interest {
    fn from(kind: FaultKind) -> Self {
        Self { kinds: vec![kind] }
    }
}

impl<const N: usize> From<[FaultKind; N]> for Interest {
    fn from(kinds: [FaultKind; N]) -> Self {
        Self {
            kinds: kinds.to_vec(),
        }
    }
}

impl From<Vec<FaultKind>> for Interest {
    fn from(kinds: Vec<FaultKind>) -> Self {
        Self { kinds }
    }
}

/// Handle returned by [`ReportRegistry::register`].
#[derive(Debug)]
pub struct ReportHandle {
    stop: Arc<AtomicBool>,
}

impl ReportHandle {
    /// Mark the callback as terminal: after it runs, no later callback or
    /// default reporting sees the fault. Returns the handle for chaining.
    #[must_use = "stop() only flags the registration; the handle may be dropped afterwards"]
    pub fn stop(self) -> Self {
        self.stop.store(true, Ordering::SeqCst);
        self
    }
}

type ReportCallback = dyn Fn(&Fault) -> Verdict + Send + Sync;

struct Registration {
    interest: Interest,
    callback: Box<ReportCallback>,
    stop: Arc<AtomicBool>,
}

/// Ordered collection of fault report callbacks.
#[derive(Default)]
pub struct ReportRegistry {
    registrations: Vec<Registration>,
}

impl ReportRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for the kinds in `interest`.
    ///
    /// Callbacks run in registration order. The returned handle can flag the
    /// registration as terminal via [`ReportHandle::stop`].
    pub fn register<F>(&mut self, interest: impl Into<Interest>, callback: F) -> ReportHandle
    where
        F: Fn(&Fault) -> Verdict + Send + Sync + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        self.registrations.push(Registration {
            interest: interest.into(),
            callback: Box::new(callback),
            stop: Arc::clone(&stop),
        });
        ReportHandle { stop }
    }

    /// Whether any registered callback subscribes to `fault`'s kind.
    #[must_use]
    pub fn handles(&self, fault: &Fault) -> bool {
        let kind = fault.kind();
        self.registrations
            .iter()
            .any(|registration| registration.interest.covers(kind))
    }

    /// Offer `fault` to matching callbacks in registration order.
    ///
    /// Returns `true` when default reporting should still run, `false` when
    /// a callback swallowed the fault or was registered as terminal.
    pub fn dispatch(&self, fault: &Fault) -> bool {
        let kind = fault.kind();
        for registration in &self.registrations {
            if !registration.interest.covers(kind) {
                continue;
            }
            if (registration.callback)(fault) == Verdict::Swallow {
                tracing::debug!(kind = %kind, "fault swallowed by report callback");
                return false;
            }
            if registration.stop.load(Ordering::SeqCst) {
                tracing::debug!(kind = %kind, "report chain stopped by terminal callback");
                return false;
            }
        }
        true
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl std::fmt::Debug for ReportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRegistry")
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::rstest;

    use super::*;
    use crate::action::DispatchError;
    use crate::render::RenderFault;

    fn dispatch_fault() -> Fault {
        Fault::from(DispatchError {
            requested: "unknownThing".into(),
        })
    }

    fn recorder(
        log: &Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
        verdict: Verdict,
    ) -> impl Fn(&Fault) -> Verdict + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |_| {
            log.lock().expect("log lock").push(name);
            verdict
        }
    }

    #[rstest]
    fn callbacks_run_in_registration_order_until_a_terminal_one() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ReportRegistry::new();
        let _first = registry.register(FaultKind::Any, recorder(&log, "first", Verdict::Share));
        let _second = registry
            .register(FaultKind::Any, recorder(&log, "second", Verdict::Share))
            .stop();
        let _third = registry.register(FaultKind::Any, recorder(&log, "third", Verdict::Share));

        let keep_reporting = registry.dispatch(&dispatch_fault());

        assert!(!keep_reporting);
        assert_eq!(*log.lock().expect("log lock"), ["first", "second"]);
    }

    #[rstest]
    fn swallow_halts_the_chain_and_default_reporting() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ReportRegistry::new();
        let _first = registry.register(FaultKind::Any, recorder(&log, "first", Verdict::Swallow));
        let _second = registry.register(FaultKind::Any, recorder(&log, "second", Verdict::Share));

        assert!(!registry.dispatch(&dispatch_fault()));
        assert_eq!(*log.lock().expect("log lock"), ["first"]);
    }

    #[rstest]
    fn sharing_callbacks_leave_default_reporting_on() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ReportRegistry::new();
        let _first = registry.register(FaultKind::Any, recorder(&log, "first", Verdict::Share));
        let _second = registry.register(FaultKind::Any, recorder(&log, "second", Verdict::Share));

        assert!(registry.dispatch(&dispatch_fault()));
        assert_eq!(*log.lock().expect("log lock"), ["first", "second"]);
    }

    #[rstest]
    fn callbacks_only_see_subscribed_kinds() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ReportRegistry::new();
        let _render_only =
            registry.register(FaultKind::Render, recorder(&log, "render", Verdict::Share));
        let _server_branch =
            registry.register(FaultKind::Server, recorder(&log, "server", Verdict::Share));

        assert!(registry.dispatch(&dispatch_fault()));
        assert!(log.lock().expect("log lock").is_empty());

        let render = Fault::from(RenderFault::UnknownView {
            view: "tickets.lost".into(),
        });
        assert!(registry.dispatch(&render));
        assert_eq!(*log.lock().expect("log lock"), ["render", "server"]);
    }

    #[rstest]
    fn multi_kind_interest_matches_each_kind() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ReportRegistry::new();
        let _both = registry.register(
            [FaultKind::Dispatch, FaultKind::Render],
            recorder(&log, "both", Verdict::Share),
        );

        assert!(registry.handles(&dispatch_fault()));
        registry.dispatch(&dispatch_fault());
        let render = Fault::from(RenderFault::Template {
            view: "calendar.panel".into(),
            message: "bad placeholder".into(),
        });
        registry.dispatch(&render);
        let internal = Fault::internal("outage");
        assert!(!registry.handles(&internal));
        registry.dispatch(&internal);

        assert_eq!(*log.lock().expect("log lock"), ["both", "both"]);
    }

    #[rstest]
    fn empty_registry_keeps_default_reporting() {
        let registry = ReportRegistry::new();
        assert!(registry.dispatch(&dispatch_fault()));
        assert!(registry.is_empty());
    }
}
