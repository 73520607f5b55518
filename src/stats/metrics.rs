//! Counters shared by every node of a router tree

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for a router and all nodes nested under it
///
/// Updated by the workers with relaxed atomics; read with
/// [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct RouterStats {
    nodes_started: AtomicU64,
    nodes_stopped: AtomicU64,
    events_published: AtomicU64,
    hops: AtomicU64,
    handlers_invoked: AtomicU64,
    handler_panics: AtomicU64,
    subscriptions: AtomicU64,
    subtrees_pruned: AtomicU64,
}

impl RouterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn node_started(&self) {
        self.nodes_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn node_stopped(&self) {
        self.nodes_stopped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn event_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn hop(&self) {
        self.hops.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn handler_invoked(&self) {
        self.handlers_invoked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn handler_panicked(&self) {
        self.handler_panics.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn subscription_added(&self) {
        self.subscriptions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn subscription_removed(&self) {
        self.subscriptions_dropped(1);
    }

    pub(crate) fn subscriptions_dropped(&self, count: u64) {
        if count == 0 {
            return;
        }
        // Saturating: a removal is only counted after a matching add
        let _ = self
            .subscriptions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(count))
            });
    }

    pub(crate) fn subtrees_pruned(&self, count: u64) {
        self.subtrees_pruned.fetch_add(count, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            nodes_started: self.nodes_started.load(Ordering::Relaxed),
            nodes_stopped: self.nodes_stopped.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            hops: self.hops.load(Ordering::Relaxed),
            handlers_invoked: self.handlers_invoked.load(Ordering::Relaxed),
            handler_panics: self.handler_panics.load(Ordering::Relaxed),
            subscriptions: self.subscriptions.load(Ordering::Relaxed),
            subtrees_pruned: self.subtrees_pruned.load(Ordering::Relaxed),
        }
    }
}

/// Copy of [`RouterStats`] at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Workers started (root and nested nodes)
    pub nodes_started: u64,
    /// Workers that have exited
    pub nodes_stopped: u64,
    /// Events accepted by the root node
    pub events_published: u64,
    /// Dispatch commands processed across all nodes
    pub hops: u64,
    /// Terminal handler invocations
    pub handlers_invoked: u64,
    /// Terminal handler invocations that panicked
    pub handler_panics: u64,
    /// Live registrations (leaf handlers, counted once per subscribe)
    pub subscriptions: u64,
    /// Nested routes dropped because their worker had stopped
    pub subtrees_pruned: u64,
}

impl StatsSnapshot {
    /// Workers currently running
    pub fn active_nodes(&self) -> u64 {
        self.nodes_started.saturating_sub(self.nodes_stopped)
    }
}
