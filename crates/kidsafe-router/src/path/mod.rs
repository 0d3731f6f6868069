//! URL path helpers
//!
//! Routes are matched against canonical paths: a leading slash, no empty
//! segments, no trailing slash except for the root itself.

use std::borrow::Cow;

mod scope;
pub use scope::{parent, scopes};

/// Checks that a path is canonical
///
/// # Examples
///
/// ```
/// use kidsafe_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/games/memory-match"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("about"));
/// assert!(!is_valid_path("/about/"));
/// assert!(!is_valid_path("/about//team"));
/// assert!(!is_valid_path("/about\\team"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    match path.strip_prefix('/') {
        Some("") => true,
        Some(rest) => !rest.contains('\\') && rest.split('/').all(|segment| !segment.is_empty()),
        None => false,
    }
}

/// Returns true when a non-root path carries a trailing slash
///
/// Strict routers treat `/about/` as a different URL than `/about`.
pub fn has_trailing_slash(path: &str) -> bool {
    path.len() > 1 && path.ends_with(['/', '\\'])
}

/// Rewrites a path into canonical form
///
/// Backslashes count as separators and empty segments are dropped, so
/// `\games//math-puzzle/` becomes `/games/math-puzzle`. Canonical input is
/// returned borrowed.
///
/// ```
/// use kidsafe_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("safe-sharing/"), "/safe-sharing");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let mut canonical = String::with_capacity(path.len() + 1);
    for segment in path.split(['/', '\\']).filter(|segment| !segment.is_empty()) {
        canonical.push('/');
        canonical.push_str(segment);
    }
    if canonical.is_empty() {
        canonical.push('/');
    }
    Cow::Owned(canonical)
}

/// Non-empty segments of a path
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
