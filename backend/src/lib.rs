//! Backend library modules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Tracing middleware attaching a trace identifier to every request.
pub use middleware::Trace;

/// Request-scoped correlation identifier; see [`domain::trace_id`].
pub use domain::TraceId;
