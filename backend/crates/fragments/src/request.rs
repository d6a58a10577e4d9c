//! Transport-neutral request parameters for a fragment endpoint.

use std::collections::BTreeMap;

/// Parameter carrying the requested action name.
pub const ACTION_PARAM: &str = "id";

/// Flat parameter bag extracted from a fragment request.
///
/// Adapters populate it from whatever the transport offers (query string,
/// form body). The action name travels in the [`ACTION_PARAM`] parameter;
/// everything else is controller data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentRequest {
    params: BTreeMap<String, String>,
}

impl FragmentRequest {
    /// A request with no parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from key-value pairs. Duplicate keys keep the last
    /// value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add or replace a parameter, consuming and returning the request.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Look up a parameter, yielding `default` when absent.
    #[must_use]
    pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.param(key).unwrap_or(default)
    }

    /// The requested action name, when the request names one.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.param(ACTION_PARAM)
    }

    /// Iterate over parameters in lexical key order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn action_reads_the_id_parameter() {
        let request = FragmentRequest::new().with_param(ACTION_PARAM, "saveTicket");
        assert_eq!(request.action(), Some("saveTicket"));
        assert_eq!(FragmentRequest::new().action(), None);
    }

    #[rstest]
    fn param_or_falls_back_when_absent() {
        let request = FragmentRequest::new().with_param("tab", "comments");
        assert_eq!(request.param_or("tab", "details"), "comments");
        assert_eq!(request.param_or("missing", "details"), "details");
    }

    #[rstest]
    fn from_pairs_keeps_the_last_duplicate() {
        let request = FragmentRequest::from_pairs([("ticket", "3"), ("ticket", "9")]);
        assert_eq!(request.param("ticket"), Some("9"));
    }
}
