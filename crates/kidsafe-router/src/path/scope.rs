//! Enclosing scopes of a path, used to find the nearest not-found view

/// The scope directly enclosing a canonical path; `None` for the root
///
/// ```
/// use kidsafe_router::path::parent;
///
/// assert_eq!(parent("/games/memory-match"), Some("/games"));
/// assert_eq!(parent("/games"), Some("/"));
/// assert_eq!(parent("/"), None);
/// ```
pub fn parent(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    path.rfind('/').map(|slash| if slash == 0 { "/" } else { &path[..slash] })
}

/// The path itself followed by every enclosing scope, innermost first
///
/// Lazy, so a lookup stops at the first scope that has what it needs.
pub fn scopes<'a>(path: &'a str) -> impl Iterator<Item = &'a str> + Clone {
    std::iter::successors(Some(path), |&scope| parent(scope))
}
