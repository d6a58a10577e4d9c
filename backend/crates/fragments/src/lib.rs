//! Building blocks for HTMX-style fragment endpoints.
//!
//! A fragment endpoint answers a request with a rendered HTML partial rather
//! than a full page. This crate supplies the transport-agnostic pieces those
//! endpoints share: a [`FragmentController`] trait describing a controller's
//! declared view and actions, a [`FragmentPipeline`] that walks the request
//! lifecycle (hooks, initialisation, action resolution, rendering), and a
//! [`ReportRegistry`] through which fatal faults are offered to registered
//! observers before the transport layer answers with an error fragment.
//!
//! The crate deliberately knows nothing about HTTP frameworks or template
//! engines. Adapters implement [`RenderFragment`] and [`SessionStore`] and
//! translate [`FragmentResponse`] into whatever the transport needs.

pub mod action;
pub mod controller;
pub mod data;
pub mod fault;
pub mod hooks;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod request;
pub mod response;
pub mod session;

pub use action::{ActionName, ActionSet, DispatchError, ResolvedAction, FALLBACK_ACTION};
pub use controller::{ActionOutcome, Blueprint, FragmentContext, FragmentController};
pub use data::FragmentData;
pub use fault::{Fault, FaultKind};
pub use hooks::{HookBoard, HookEvent, LifecycleHook};
pub use pipeline::FragmentPipeline;
pub use render::{escape_html, FixtureRenderer, RenderFragment, RenderFault, RenderedFragment, ViewName};
pub use report::{Interest, ReportHandle, ReportRegistry, Verdict};
pub use request::{FragmentRequest, ACTION_PARAM};
pub use response::{FragmentResponse, HX_REDIRECT, HX_TRIGGER};
pub use session::{MemorySession, SessionStore};
