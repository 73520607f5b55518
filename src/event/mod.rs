//! Event envelope
//!
//! An [`Event`] pairs a [`Route`] with an opaque [`Payload`]. Events are
//! cheap to clone: the payload and the route segments are reference
//! counted, only the route cursor is copied.

pub mod route;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use route::{Pattern, Route, SEPARATOR, WILDCARD};

/// Opaque event payload shared by every handler the event reaches
#[derive(Clone)]
pub struct Payload(Arc<dyn Any + Send + Sync>);

impl Payload {
    /// Wrap any value as a payload
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the payload as `T` if that is its type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Check the payload type
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

/// A published event as seen by handlers
///
/// The route cursor points at the segment matched at the handler's depth,
/// so `event.route().current()` is that segment.
#[derive(Debug, Clone)]
pub struct Event {
    route: Route,
    payload: Payload,
}

impl Event {
    /// Create an event for a topic, positioned before its first segment
    pub fn new<T: Any + Send + Sync>(topic: &str, payload: T) -> Self {
        Self::with_payload(topic, Payload::new(payload))
    }

    /// Create an event from an already wrapped payload
    pub fn with_payload(topic: &str, payload: Payload) -> Self {
        Self {
            route: Route::new(topic),
            payload,
        }
    }

    /// Route of this event
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub(crate) fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }

    /// Opaque payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Payload as `T` if that is its type
    pub fn payload_as<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// The full published topic
    pub fn topic(&self) -> String {
        self.route.topic()
    }
}
