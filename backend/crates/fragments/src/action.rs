//! Action naming and resolution for fragment controllers.
//!
//! Requests select a controller action by name. Clients spell the name in
//! whatever case convention their markup prefers (`save-ticket`,
//! `save_ticket`, `saveTicket`), so names are normalised to camelCase before
//! lookup. A request that names no action asks for the [`FALLBACK_ACTION`];
//! a request that names an undeclared action falls back to it only when the
//! controller declares it.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Action invoked when a request names none, and the fallback for requests
/// naming an action the controller does not declare.
pub const FALLBACK_ACTION: &str = "run";

/// A normalised (camelCase) action name.
///
/// Construction always normalises, so two `ActionName`s built from any
/// spelling of the same name compare equal. Normalisation is idempotent:
/// feeding an already-normalised name back through [`ActionName::normalize`]
/// returns it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionName(String);

impl ActionName {
    /// Normalise `raw` to camelCase.
    ///
    /// Splits on `-`, `_`, and whitespace, upper-cases the first character of
    /// every segment after the first, joins the segments, and lower-cases the
    /// leading character of the result. Characters beyond the first of each
    /// segment keep their original case.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let mut joined = String::with_capacity(raw.len());
        for (index, segment) in raw
            .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|segment| !segment.is_empty())
            .enumerate()
        {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if index > 0 => joined.extend(first.to_uppercase()),
                Some(first) => joined.push(first),
                None => {}
            }
            joined.push_str(chars.as_str());
        }
        let mut chars = joined.chars();
        let name = match chars.next() {
            Some(first) => {
                let mut lowered: String = first.to_lowercase().collect();
                lowered.push_str(chars.as_str());
                lowered
            }
            None => String::new(),
        };
        Self(name)
    }

    /// The normalised name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionName {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

/// The set of action names a controller declares.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    names: BTreeSet<String>,
}

impl ActionSet {
    /// Build a set from declared names, normalising each.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| ActionName::normalize(name.as_ref()).0)
                .collect(),
        }
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &ActionName) -> bool {
        self.names.contains(name.as_str())
    }

    /// Whether the [`FALLBACK_ACTION`] is declared.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.names.contains(FALLBACK_ACTION)
    }

    /// Declared names in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of declared names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Outcome of a successful action resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    name: ActionName,
    fallback: bool,
}

impl ResolvedAction {
    /// The action to invoke.
    #[must_use]
    pub fn name(&self) -> &ActionName {
        &self.name
    }

    /// Whether resolution substituted the fallback for an undeclared name.
    ///
    /// A request naming no action resolves to the default without counting
    /// as a fallback.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Raised when a request cannot be mapped onto any declared action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no action named `{requested}` and no `{FALLBACK_ACTION}` fallback declared")]
pub struct DispatchError {
    /// The normalised name the request asked for.
    pub requested: String,
}

/// Map a requested action name onto one of `actions`.
///
/// An absent request resolves to [`FALLBACK_ACTION`]. A present name is
/// normalised and used when declared; otherwise resolution falls back to
/// [`FALLBACK_ACTION`] when declared and fails with [`DispatchError`] when
/// not. Resolution is a pure function of its inputs, so repeated calls with
/// the same request and action set agree.
pub fn resolve(requested: Option<&str>, actions: &ActionSet) -> Result<ResolvedAction, DispatchError> {
    let name = ActionName::normalize(requested.unwrap_or(FALLBACK_ACTION));
    if actions.contains(&name) {
        return Ok(ResolvedAction {
            name,
            fallback: false,
        });
    }
    if actions.has_fallback() {
        tracing::debug!(requested = %name, "undeclared action, using fallback");
        return Ok(ResolvedAction {
            name: ActionName::normalize(FALLBACK_ACTION),
            fallback: true,
        });
    }
    Err(DispatchError {
        requested: name.0,
    })
}
