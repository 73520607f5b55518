//! Node table entries and worker commands
//!
//! A node's table maps a segment to the ordered list of [`Binding`]s
//! subscribed under it. A binding is either a terminal handler or a
//! subtree: a nested router that owns the rest of a multi-segment pattern.

use std::sync::Arc;

use crate::event::{Event, Pattern};

use super::handler::{same_handler, Handler};
use super::node::Router;
use super::subscription::SubscriptionId;

/// One registration at one trie level
pub(crate) enum Binding {
    /// Handler invoked at this depth
    Leaf {
        id: SubscriptionId,
        handler: Arc<dyn Handler>,
    },
    /// Adapter forwarding into a child node built for a single subscription
    Subtree {
        id: SubscriptionId,
        /// Handler at the end of the chain, kept for identity removal
        handler: Arc<dyn Handler>,
        /// Pattern the child node was built for
        rest: Pattern,
        router: Router,
    },
}

impl Binding {
    pub(crate) fn id(&self) -> SubscriptionId {
        match self {
            Binding::Leaf { id, .. } | Binding::Subtree { id, .. } => *id,
        }
    }

    /// Whether removing `removal` with remaining pattern `rest` targets this
    /// binding
    pub(crate) fn matches(&self, removal: &Removal, rest: Option<&Pattern>) -> bool {
        let (id, handler) = match (self, rest) {
            (Binding::Leaf { id, handler }, None) => (id, handler),
            (
                Binding::Subtree {
                    id,
                    handler,
                    rest: own,
                    ..
                },
                Some(rest),
            ) if own == rest => (id, handler),
            _ => return false,
        };

        match removal {
            Removal::Id(target) => id == target,
            Removal::Handler(target) => same_handler(handler, target),
        }
    }
}

/// How an unsubscribe identifies the registration to remove
#[derive(Clone)]
pub(crate) enum Removal {
    /// The token returned by `subscribe`
    Id(SubscriptionId),
    /// The same shared handler allocation that was subscribed
    Handler(Arc<dyn Handler>),
}

impl std::fmt::Debug for Removal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Removal::Id(id) => write!(f, "{}", id),
            Removal::Handler(handler) => {
                write!(f, "handler@{:p}", Arc::as_ptr(handler) as *const ())
            }
        }
    }
}

/// Unit of work queued on a node
pub(crate) enum Command {
    Subscribe {
        pattern: Pattern,
        id: SubscriptionId,
        handler: Arc<dyn Handler>,
    },
    Unsubscribe {
        pattern: Pattern,
        removal: Removal,
    },
    Dispatch(Event),
}
