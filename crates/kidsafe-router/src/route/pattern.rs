/// Route pattern parsing and matching
///
/// Patterns are written the way they appear in URLs: literal segments plus
/// `:name` segments that capture one path segment. The parsed form is a list
/// of tagged segments so richer segment kinds can be added without touching
/// callers.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::{Result, RouterError};
use crate::path::{is_valid_path, segments};

/// One segment of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text that must match exactly
    Static(String),
    /// Captures a single path segment under the given name
    Param(String),
}

impl Segment {
    /// Classifies a raw pattern segment
    ///
    /// # Examples
    ///
    /// ```
    /// use kidsafe_router::route::Segment;
    ///
    /// assert_eq!(Segment::classify("games"), Segment::Static("games".into()));
    /// assert_eq!(Segment::classify(":slug"), Segment::Param("slug".into()));
    /// ```
    pub fn classify(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Static(raw.to_string()),
        }
    }

    fn matches(&self, value: &str, case_insensitive: bool) -> bool {
        match self {
            Segment::Param(_) => true,
            Segment::Static(text) if case_insensitive => text.eq_ignore_ascii_case(value),
            Segment::Static(text) => text == value,
        }
    }
}

/// A parsed, validated route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses a pattern such as `/games/memory-match` or `/stories/:id`
    ///
    /// Patterns must be canonical paths (leading slash, no trailing or doubled
    /// slashes) with unique, non-empty parameter names.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !is_valid_path(pattern) {
            return Err(invalid("expected a canonical absolute path"));
        }

        if pattern.contains(['?', '#', '*']) {
            return Err(invalid("query, fragment and wildcard characters are not allowed"));
        }

        let segments: Vec<Segment> = segments(pattern).map(Segment::classify).collect();

        let mut seen = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) = segment {
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(invalid("parameter names must be non-empty identifiers"));
                }
                if seen.contains(&name) {
                    return Err(invalid("parameter names must be unique"));
                }
                seen.push(name);
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the pattern has no parameter segments
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Static(_)))
    }

    /// Names of the captured parameters, in pattern order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Matches a canonical path, returning the captured parameters
    ///
    /// Every segment is percent-decoded before comparison, so `/child%2Dhelp`
    /// matches `/child-help`. A segment that does not decode to UTF-8 is
    /// compared as written.
    ///
    /// # Examples
    ///
    /// ```
    /// use kidsafe_router::route::RoutePattern;
    ///
    /// let pattern = RoutePattern::parse("/stories/:id").unwrap();
    /// let params = pattern.matches("/stories/42", false).unwrap();
    /// assert_eq!(params.get("id").map(String::as_str), Some("42"));
    ///
    /// assert!(pattern.matches("/stories", false).is_none());
    /// ```
    pub fn matches(&self, path: &str, case_insensitive: bool) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            let decoded = decode_segment(part);
            if !segment.matches(&decoded, case_insensitive) {
                return None;
            }
            if let Segment::Param(name) = segment {
                params.insert(name.clone(), decoded.into_owned());
            }
        }

        Some(params)
    }

    /// True when some concrete URL would match both patterns
    ///
    /// Two patterns overlap when they have the same number of segments and, at
    /// every position, either side is a parameter or both literals are equal.
    pub fn overlaps(&self, other: &RoutePattern, case_insensitive: bool) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Static(a), Segment::Static(b)) if case_insensitive => {
                        a.eq_ignore_ascii_case(b)
                    }
                    (Segment::Static(a), Segment::Static(b)) => a == b,
                    _ => true,
                })
    }

    /// True when both patterns are the same route written twice
    ///
    /// Literals must agree and parameters must sit at the same positions;
    /// parameter names are irrelevant.
    pub fn same_shape(&self, other: &RoutePattern, case_insensitive: bool) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Static(a), Segment::Static(b)) if case_insensitive => {
                        a.eq_ignore_ascii_case(b)
                    }
                    (Segment::Static(a), Segment::Static(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Builds a concrete path by substituting parameters
    ///
    /// Returns the name of the first missing parameter on failure. Values are
    /// percent-encoded.
    pub fn generate(&self, params: &HashMap<String, String>) -> std::result::Result<String, String> {
        let parts = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(text) => Ok(text.clone()),
                Segment::Param(name) => params
                    .get(name)
                    .map(|value| urlencoding::encode(value).into_owned())
                    .ok_or_else(|| name.clone()),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(format!("/{}", parts.join("/")))
    }
}

fn decode_segment(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
