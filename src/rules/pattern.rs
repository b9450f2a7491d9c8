//! Path Pattern Markers
//!
//! A pattern is a root-relative list of markers:
//! - `{` an object
//! - `[` an array
//! - a property name, always followed by the `{` or `[` it opens
//!
//! `["{", "Telemetry", "[", "{"]` reads as: root object, its `Telemetry`
//! array, an object element of that array.

use std::fmt;

/// One element of a path pattern
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PathMarker {
    /// `{`
    Object,
    /// `[`
    Array,
    /// Property name, raw bytes as they appear between quotes
    Name(Box<[u8]>),
}

impl PathMarker {
    /// Parse one marker: `{`, `[`, anything else is a property name
    pub fn parse(marker: &str) -> Self {
        match marker {
            "{" => PathMarker::Object,
            "[" => PathMarker::Array,
            name => PathMarker::Name(name.as_bytes().into()),
        }
    }

    /// Property name marker from raw bytes, for names that are not valid UTF-8
    /// or that collide with `{` / `[`
    pub fn name(bytes: impl AsRef<[u8]>) -> Self {
        PathMarker::Name(bytes.as_ref().into())
    }
}

impl From<&str> for PathMarker {
    fn from(marker: &str) -> Self {
        PathMarker::parse(marker)
    }
}

impl fmt::Debug for PathMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathMarker::Object => f.write_str("{"),
            PathMarker::Array => f.write_str("["),
            PathMarker::Name(name) => write!(f, "{:?}", String::from_utf8_lossy(name)),
        }
    }
}

/// Parse a sequence of marker strings
pub fn parse_markers<I, S>(markers: I) -> Vec<PathMarker>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    markers
        .into_iter()
        .map(|m| PathMarker::parse(m.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markers() {
        let markers = parse_markers(["{", "Telemetry", "[", "{"]);
        assert_eq!(
            markers,
            vec![
                PathMarker::Object,
                PathMarker::name("Telemetry"),
                PathMarker::Array,
                PathMarker::Object,
            ]
        );
    }

    #[test]
    fn test_debug() {
        let markers = parse_markers(vec!["{".to_string(), "a".to_string(), "[".to_string()]);
        assert_eq!(format!("{:?}", markers), r#"[{, "a", []"#);
    }
}
