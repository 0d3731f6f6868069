//! Scroll policy applied after every committed navigation
//!
//! The policy is a pure function of the navigation request; the host (browser
//! glue, a test, the CLI) performs the actual scrolling.

use serde::{Deserialize, Serialize};

use crate::navigation::NavigationRequest;

/// A document scroll offset in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub left: f64,
    pub top: f64,
}

impl ScrollPosition {
    pub const TOP: ScrollPosition = ScrollPosition { left: 0.0, top: 0.0 };

    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Jump without animation
    Instant,
    /// Animated scroll
    Smooth,
}

/// Where the document should scroll once the new view is shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScrollTarget {
    /// Scroll the element with this id into view
    Element { id: String, behavior: ScrollBehavior },
    /// Scroll to an absolute offset
    Position {
        position: ScrollPosition,
        behavior: ScrollBehavior,
    },
}

impl ScrollTarget {
    pub fn top() -> Self {
        ScrollTarget::Position {
            position: ScrollPosition::TOP,
            behavior: ScrollBehavior::Instant,
        }
    }
}

/// Decides the scroll target of a navigation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollPolicy {
    /// Prefer the position saved on a history entry when traversing
    pub restore_saved_position: bool,
}

impl ScrollPolicy {
    pub fn new(restore_saved_position: bool) -> Self {
        Self {
            restore_saved_position,
        }
    }

    /// Computes the scroll target for a request
    ///
    /// A fragment scrolls smoothly to the element named by it; anything else
    /// jumps to the top. When restoring is enabled, a traversal with a saved
    /// position returns to that position instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use kidsafe_router::{NavigationRequest, ScrollPolicy, ScrollTarget, ScrollBehavior};
    ///
    /// let policy = ScrollPolicy::default();
    ///
    /// let target = policy.target(&NavigationRequest::push("/about#team"));
    /// assert_eq!(
    ///     target,
    ///     ScrollTarget::Element { id: "team".into(), behavior: ScrollBehavior::Smooth }
    /// );
    ///
    /// assert_eq!(policy.target(&NavigationRequest::push("/about")), ScrollTarget::top());
    /// ```
    pub fn target(&self, request: &NavigationRequest) -> ScrollTarget {
        if self.restore_saved_position && request.is_traversal() {
            if let Some(position) = request.saved_position {
                return ScrollTarget::Position {
                    position,
                    behavior: ScrollBehavior::Instant,
                };
            }
        }

        match request.location.hash.as_deref().and_then(|h| h.strip_prefix('#')) {
            Some(fragment) if !fragment.is_empty() => ScrollTarget::Element {
                id: urlencoding::decode(fragment)
                    .map(|id| id.into_owned())
                    .unwrap_or_else(|_| fragment.to_string()),
                behavior: ScrollBehavior::Smooth,
            },
            _ => ScrollTarget::top(),
        }
    }
}
