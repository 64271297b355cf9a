//! Conditional request module
//!
//! `ETag` generation and `If-None-Match` evaluation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate an `ETag` for a body
///
/// Combines content length and a content hash into a quoted tag, e.g.
/// `"1f-ab12cd34"`.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Evaluate an `If-None-Match` header against the current `ETag`
///
/// Handles comma-separated tag lists and the `*` wildcard. Returns true when
/// the client's copy is current (respond 304).
pub fn none_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == etag || candidate == "*")
    })
}
