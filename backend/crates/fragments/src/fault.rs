//! Fatal fault taxonomy for the fragment lifecycle.
//!
//! Faults abort the request and reach the transport's error adapter;
//! recoverable conditions (authorisation denied, record not found) never
//! appear here because controllers answer those with error fragments
//! directly. Kinds form a tree so report callbacks can subscribe to a
//! branch: registering for [`FaultKind::Server`] also observes
//! configuration and render faults.

use thiserror::Error;

use crate::action::DispatchError;
use crate::render::RenderFault;

/// Classification of a [`Fault`], arranged as a tree.
///
/// ```text
/// Any
/// ├── Request
/// │   └── Dispatch
/// └── Server
///     ├── Configuration
///     └── Render
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Root of the tree; matches every fault.
    Any,
    /// Faults caused by the shape of the request.
    Request,
    /// The request named no resolvable action.
    Dispatch,
    /// Faults in the service itself.
    Server,
    /// A controller or deployment is wired incorrectly.
    Configuration,
    /// The template layer failed.
    Render,
}

impl FaultKind {
    /// The kind's parent in the tree, `None` for [`FaultKind::Any`].
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Any => None,
            Self::Request | Self::Server => Some(Self::Any),
            Self::Dispatch => Some(Self::Request),
            Self::Configuration | Self::Render => Some(Self::Server),
        }
    }

    /// Whether a subscription to `self` covers a fault of kind `actual`.
    ///
    /// True when `self` is `actual` or one of its ancestors.
    #[must_use]
    pub fn matches(self, actual: Self) -> bool {
        let mut cursor = Some(actual);
        while let Some(kind) = cursor {
            if kind == self {
                return true;
            }
            cursor = kind.parent();
        }
        false
    }

    /// Stable lower-case label for logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Request => "request",
            Self::Dispatch => "dispatch",
            Self::Server => "server",
            Self::Configuration => "configuration",
            Self::Render => "render",
        }
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A condition that aborts the fragment lifecycle.
#[derive(Debug, Error)]
pub enum Fault {
    /// The controller declares no view to render.
    #[error("fragment controller `{controller}` declares no view")]
    Configuration {
        /// Name of the misconfigured controller.
        controller: String,
    },
    /// The request named no resolvable action.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The template layer failed.
    #[error(transparent)]
    Render(#[from] RenderFault),
    /// An action hit an unrecoverable internal failure.
    #[error("{message}")]
    Internal {
        /// Operator-facing description; never shown to clients.
        message: String,
    },
}

impl Fault {
    /// An internal fault carrying an operator-facing message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The fault's kind in the [`FaultKind`] tree.
    #[must_use]
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Configuration { .. } => FaultKind::Configuration,
            Self::Dispatch(_) => FaultKind::Dispatch,
            Self::Render(_) => FaultKind::Render,
            Self::Internal { .. } => FaultKind::Server,
        }
    }
}
