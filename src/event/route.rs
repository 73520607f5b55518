//! Topic routes and subscription patterns
//!
//! Both are dot-delimited segment lists. A [`Route`] is what an event
//! carries while it walks the trie; a [`Pattern`] is what a handler is
//! subscribed under.

use std::fmt;
use std::sync::Arc;

/// Segment that matches any single segment at its depth
pub const WILDCARD: &str = "*";

/// Separator between segments
pub const SEPARATOR: char = '.';

/// Segments of a published topic plus a traversal cursor
///
/// The segments are shared between clones, the cursor is not: every hop
/// works on its own copy, so sibling branches never observe each other's
/// position.
#[derive(Clone, PartialEq, Eq)]
pub struct Route {
    segments: Arc<[String]>,
    /// `None` until the first `advance`
    position: Option<usize>,
}

impl Route {
    /// Split a topic into a route positioned before its first segment
    pub fn new(topic: &str) -> Self {
        Self {
            segments: topic.split(SEPARATOR).map(str::to_owned).collect(),
            position: None,
        }
    }

    /// Move the cursor forward
    ///
    /// Returns whether a segment exists at the new position. The cursor
    /// never moves past one beyond the last segment.
    pub fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p + 1).min(self.segments.len());
        self.position = Some(next);
        next < self.segments.len()
    }

    /// Segment at the cursor
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not on a segment. Dispatch only reads the
    /// current segment after a successful [`advance`](Self::advance).
    pub fn current(&self) -> &str {
        match self.try_current() {
            Some(segment) => segment,
            None => panic!(
                "route cursor {:?} out of bounds for {} segment(s)",
                self.position,
                self.segments.len()
            ),
        }
    }

    /// Segment at the cursor, if any
    pub fn try_current(&self) -> Option<&str> {
        self.position
            .and_then(|p| self.segments.get(p))
            .map(String::as_str)
    }

    /// Cursor position, `None` before the first advance
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// All segments of the topic
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A split topic always has at least one (possibly empty) segment
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The published topic, segments rejoined
    pub fn topic(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("segments", &&*self.segments)
            .field("position", &self.position)
            .finish()
    }
}

/// A parsed subscription pattern
///
/// Never empty: splitting `""` yields one empty segment, which is a valid
/// (if unusual) exact segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    segments: Vec<String>,
}

impl Pattern {
    /// Split a dot-delimited pattern into segments
    pub fn parse(pattern: &str) -> Self {
        Self {
            segments: pattern.split(SEPARATOR).map(str::to_owned).collect(),
        }
    }

    /// First segment, the key at the node the pattern is applied to
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// The pattern without its first segment, `None` for a single segment
    pub fn rest(&self) -> Option<Pattern> {
        if self.segments.len() > 1 {
            Some(Self {
                segments: self.segments[1..].to_vec(),
            })
        } else {
            None
        }
    }

    /// All segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of trie levels this pattern spans
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether the segment at `depth` is the wildcard
    pub fn is_wildcard_at(&self, depth: usize) -> bool {
        self.segments.get(depth).is_some_and(|s| s == WILDCARD)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}
