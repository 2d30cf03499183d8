//! Utility functions

use percent_encoding::{AsciiSet, CONTROLS};

// Characters encoded inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Extract header value as string
pub fn header_str(headers: &http::HeaderMap, name: &str) -> Option<String> {
    headers.get(name)?.to_str().ok().map(|s| s.to_string())
}

/// Generate a new request ID
pub fn generate_request_id() -> String {
    format!("sdk-{}", uuid::Uuid::new_v4())
}

/// URL encode a single path segment
pub fn encode_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SEGMENT).to_string()
}

/// Split a logical path into its non-empty segments.
///
/// Leading, trailing and repeated `/` are dropped, so `"/secret//data/app/"`
/// yields `["secret", "data", "app"]`.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Encode a logical path segment by segment, keeping `/` as separator
pub fn encode_path(path: &str) -> String {
    path_segments(path)
        .into_iter()
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}
