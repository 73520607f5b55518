//! Subscription tokens

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::event::Pattern;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one `subscribe` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Token returned by [`Router::subscribe`](crate::Router::subscribe)
///
/// Passing it to [`Router::unsubscribe`](crate::Router::unsubscribe)
/// removes exactly the registration it was issued for, even when the same
/// handler is subscribed several times under the same pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
    pattern: Pattern,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, pattern: Pattern) -> Self {
        Self { id, pattern }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Pattern the handler was subscribed under
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}
