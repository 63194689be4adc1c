//! Hierarchical query keys.

use std::fmt;

/// An ordered list of segments, e.g. `departments:detail:d1`.
///
/// Invalidation matches by prefix: `["departments"]` covers every
/// department key, `["departments", "list"]` every department list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn root(resource: impl Into<String>) -> Self {
        Self(vec![resource.into()])
    }

    /// Returns a new key with one more segment.
    pub fn with(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment, used as the metrics label.
    pub fn resource(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

impl<S: Into<String>> FromIterator<S> for QueryKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching_is_segment_wise() {
        let detail = QueryKey::root("sessions").with("detail").with("s1");
        assert!(detail.starts_with(&QueryKey::root("sessions")));
        assert!(detail.starts_with(&QueryKey::root("sessions").with("detail")));
        assert!(!detail.starts_with(&QueryKey::root("sessions").with("list")));
        assert!(!QueryKey::root("sessionsX").starts_with(&QueryKey::root("sessions")));
    }

    #[test]
    fn test_display_joins_segments() {
        let key: QueryKey = ["attendance", "student", "u1"].into_iter().collect();
        assert_eq!(key.to_string(), "attendance:student:u1");
        assert_eq!(key.resource(), "attendance");
    }
}
