//! Navigation requests and the locations they point at

use serde::{Deserialize, Serialize};

use crate::scroll::ScrollPosition;

/// A parsed in-app URL: path, query pairs and fragment
///
/// The path is kept as written; matching normalizes it separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    #[serde(default)]
    pub query: Vec<(String, String)>,
    /// Fragment including its leading `#`, as in `#team`
    #[serde(default)]
    pub hash: Option<String>,
}

impl Location {
    /// Parses an application URL such as `/about?tab=staff#team`
    ///
    /// # Examples
    ///
    /// ```
    /// use kidsafe_router::Location;
    ///
    /// let location = Location::parse("/about?tab=staff#team");
    /// assert_eq!(location.path, "/about");
    /// assert_eq!(location.query, vec![("tab".to_string(), "staff".to_string())]);
    /// assert_eq!(location.hash.as_deref(), Some("#team"));
    /// ```
    pub fn parse(url: &str) -> Self {
        let (rest, hash) = match url.find('#') {
            Some(pos) => (&url[..pos], Some(url[pos..].to_string())),
            None => (url, None),
        };

        let (path, query) = match rest.find('?') {
            Some(pos) => (&rest[..pos], parse_query(&rest[pos + 1..])),
            None => (rest, Vec::new()),
        };

        let path = if path.is_empty() { "/" } else { path };

        Self {
            path: path.to_string(),
            query,
            hash: hash.filter(|h| h.len() > 1),
        }
    }

    /// Parses a URL that may carry the application's base path
    ///
    /// `base_prefix` is the base path without its trailing slash. The prefix is
    /// stripped only on a segment boundary, so `/kidsafe` does not eat into
    /// `/kidsafety`.
    pub fn parse_with_base(url: &str, base_prefix: &str) -> Self {
        if base_prefix.is_empty() {
            return Self::parse(url);
        }

        match url.strip_prefix(base_prefix) {
            Some(rest) if rest.is_empty() => Self::parse("/"),
            Some(rest) if rest.starts_with(['/', '?', '#']) => {
                if rest.starts_with('/') {
                    Self::parse(rest)
                } else {
                    Self::parse(&format!("/{}", rest))
                }
            }
            _ => Self::parse(url),
        }
    }

    /// Path, query and fragment as one string, relative to the base path
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            out.push('?');
            out.push_str(&pairs.join("&"));
        }
        if let Some(hash) = &self.hash {
            out.push_str(hash);
        }
        out
    }

    /// Full URL under the given base prefix
    pub fn href(&self, base_prefix: &str) -> String {
        format!("{}{}", base_prefix, self.full_path())
    }
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

/// How a committed navigation changes the history stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Adds a new entry (link click, programmatic push)
    Push,
    /// Overwrites the current entry
    Replace,
    /// Moves through existing entries (back/forward)
    Traverse(isize),
}

/// A requested URL change
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    pub location: Location,
    pub kind: NavigationKind,
    /// Scroll position recorded on the target entry; only set for traversals
    pub saved_position: Option<ScrollPosition>,
}

impl NavigationRequest {
    pub fn push(url: &str) -> Self {
        Self {
            location: Location::parse(url),
            kind: NavigationKind::Push,
            saved_position: None,
        }
    }

    pub fn replace(url: &str) -> Self {
        Self {
            kind: NavigationKind::Replace,
            ..Self::push(url)
        }
    }

    pub fn traverse(location: Location, delta: isize, saved_position: Option<ScrollPosition>) -> Self {
        Self {
            location,
            kind: NavigationKind::Traverse(delta),
            saved_position,
        }
    }

    pub fn is_traversal(&self) -> bool {
        matches!(self.kind, NavigationKind::Traverse(_))
    }
}

impl From<&str> for NavigationRequest {
    fn from(url: &str) -> Self {
        Self::push(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain_path() {
        let location = Location::parse("/child-help");
        assert_eq!(location.path, "/child-help");
        assert!(location.query.is_empty());
        assert_eq!(location.hash, None);
        assert_eq!(location.full_path(), "/child-help");
    }

    #[test]
    fn test_parse_empty_and_bare_fragment() {
        assert_eq!(Location::parse("").path, "/");
        assert_eq!(Location::parse("#").hash, None);
        assert_eq!(Location::parse("#faq").path, "/");
    }

    #[test]
    fn test_query_decoding() {
        let location = Location::parse("/safe-sharing?name=Amy+Lee&topic=school%20bus&flag");
        assert_eq!(
            location.query,
            vec![
                ("name".to_string(), "Amy Lee".to_string()),
                ("topic".to_string(), "school bus".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
        assert_eq!(
            location.full_path(),
            "/safe-sharing?name=Amy%20Lee&topic=school%20bus&flag="
        );
    }

    #[test]
    fn test_parse_with_base() {
        assert_eq!(Location::parse_with_base("/kids/about", "/kids").path, "/about");
        assert_eq!(Location::parse_with_base("/kids", "/kids").path, "/");
        assert_eq!(Location::parse_with_base("/kids#top", "/kids").hash.as_deref(), Some("#top"));
        assert_eq!(Location::parse_with_base("/kidsafety", "/kids").path, "/kidsafety");
        assert_eq!(Location::parse_with_base("/about", "").path, "/about");
    }

    #[test]
    fn test_href_prefixes_base() {
        let location = Location::parse("/about#team");
        assert_eq!(location.href("/kids"), "/kids/about#team");
        assert_eq!(location.href(""), "/about#team");
    }

    #[test]
    fn test_request_constructors() {
        let request = NavigationRequest::from("/login");
        assert_eq!(request.kind, NavigationKind::Push);
        assert!(!request.is_traversal());

        let request = NavigationRequest::replace("/");
        assert_eq!(request.kind, NavigationKind::Replace);

        let request = NavigationRequest::traverse(Location::parse("/about"), -1, None);
        assert!(request.is_traversal());
    }
}
