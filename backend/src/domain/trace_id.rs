//! Correlation identifiers threaded through request handling.
//!
//! The tracing middleware mints one [`TraceId`] per request and installs it
//! with [`with_trace_id`]. Code running inside that scope, chiefly error
//! construction, reads it back through [`current_trace_id`] instead of
//! threading the identifier down every call path.
//!
//! Task locals do not survive `tokio::spawn`. Work handed to another task
//! needs its own [`with_trace_id`] wrapper around the spawned future.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static ACTIVE_TRACE: TraceId;
}

/// Correlation identifier for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a fresh random identifier for an incoming request.
    pub(crate) fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Run `fut` with `id` installed as the ambient trace identifier.
///
/// Scopes nest; an inner scope shadows the outer one until its future
/// completes.
///
/// # Examples
/// ```
/// use backend::domain::{TraceId, current_trace_id, with_trace_id};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "00000000-0000-0000-0000-000000000000"
///     .parse()
///     .expect("valid UUID");
/// let seen = with_trace_id(id, async { current_trace_id() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
pub async fn with_trace_id<F>(id: TraceId, fut: F) -> F::Output
where
    F: Future,
{
    ACTIVE_TRACE.scope(id, fut).await
}

/// The trace identifier of the surrounding request, if one is in scope.
#[must_use]
pub fn current_trace_id() -> Option<TraceId> {
    ACTIVE_TRACE.try_with(|id| *id).ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn fixed_id(uuid: Uuid) -> TraceId {
        uuid.to_string().parse().expect("UUID strings parse")
    }

    #[rstest]
    fn minted_identifiers_are_distinct_and_parseable() {
        let first = TraceId::mint();
        let second = TraceId::mint();
        assert_ne!(first, second);
        let round_tripped: TraceId = first.to_string().parse().expect("minted ids parse");
        assert_eq!(round_tripped, first);
    }

    #[rstest]
    fn parsing_rejects_non_uuid_input() {
        assert!("not-a-trace".parse::<TraceId>().is_err());
    }

    #[tokio::test]
    async fn scope_exposes_the_installed_identifier() {
        let id = TraceId::mint();
        let seen = with_trace_id(id, async { current_trace_id() }).await;
        assert_eq!(seen, Some(id));
    }

    #[tokio::test]
    async fn no_identifier_outside_a_scope() {
        assert!(current_trace_id().is_none());
    }

    #[tokio::test]
    async fn inner_scope_shadows_then_restores_the_outer() {
        let outer = fixed_id(Uuid::nil());
        let inner = fixed_id(Uuid::max());
        let (within, after) = with_trace_id(outer, async move {
            let within = with_trace_id(inner, async { current_trace_id() }).await;
            (within, current_trace_id())
        })
        .await;
        assert_eq!(within, Some(inner));
        assert_eq!(after, Some(outer));
    }
}
