use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Ordered header mapping with last-write-wins insertion.
///
/// Keys map to the text after the first `": "` up to the next one (if any);
/// the value is absent when the line had no delimiter. Re-inserting an
/// existing name replaces its value but keeps the position of the first
/// insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, Option<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`. Returns the previous value when the name
    /// was already present (`Some(None)` for a previously absent value).
    pub fn insert(&mut self, name: String, value: Option<String>) -> Option<Option<String>> {
        self.entries.insert(name, value)
    }

    /// Exact-match lookup. The outer `Option` is key presence, the inner one
    /// is the stored value.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries.get(name).map(Option::as_deref)
    }

    /// Look up a value by name (case-insensitive), flattening absent values.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k.into(), Some(v.into()));
        }
        headers
    }
}

/// Serialized as a JSON object in insertion order; absent values become `null`.
impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// ParsedRequest
// ---------------------------------------------------------------------------

/// A raw request decomposed into its textual parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRequest {
    /// First space-delimited field of the request line.
    pub method: Option<String>,
    /// Second field: the request target, not necessarily a full URL.
    pub url: Option<String>,
    /// Third field, e.g. `HTTP/1.1`.
    pub version: Option<String>,
    pub headers: Headers,
    /// Everything after the header block, rejoined with `\r\n`.
    pub body: String,
    /// The input exactly as received.
    pub raw: String,
}

impl ParsedRequest {
    /// Shorthand for a case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get_ignore_case(name)
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}
