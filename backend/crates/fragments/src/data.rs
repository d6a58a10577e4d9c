//! Key-value payload handed to the template layer.

use serde::Serialize;
use serde_json::{Map, Value};

/// Values assigned by a controller action for the view to interpolate.
///
/// Keys assigned twice keep the latest value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FragmentData {
    values: Map<String, Value>,
}

impl FragmentData {
    /// An empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` under `key`, replacing any previous assignment.
    pub fn assign(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Fetch a previously assigned value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Iterate over assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of assigned keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FragmentData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.assign(key, value);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn later_assignment_replaces_earlier() {
        let mut data = FragmentData::new();
        data.assign("ticket", json!({"id": 7}));
        data.assign("ticket", json!({"id": 9}));
        assert_eq!(data.get("ticket"), Some(&json!({"id": 9})));
        assert_eq!(data.len(), 1);
    }

    #[rstest]
    fn serializes_as_a_flat_object() {
        let data: FragmentData = [("count", json!(2)), ("label", json!("open"))]
            .into_iter()
            .collect();
        let encoded = serde_json::to_value(&data).expect("fragment data serialises");
        assert_eq!(encoded, json!({"count": 2, "label": "open"}));
    }
}
