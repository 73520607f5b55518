//! Router configuration

/// Default number of commands a node's queue holds before senders wait
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Router configuration options
///
/// Nested nodes created by multi-segment subscriptions inherit the
/// configuration of the router they were created under.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Commands buffered per node before `publish`/`subscribe` wait
    pub queue_capacity: usize,

    /// Catch handler panics and keep the worker running
    ///
    /// When disabled, a panicking handler stops the worker of the node
    /// that invoked it and later commands to that node fail with
    /// [`RouterError::WorkerStopped`](crate::RouterError::WorkerStopped).
    pub isolate_panics: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            isolate_panics: false,
        }
    }
}

impl RouterConfig {
    /// Set the per-node queue capacity (at least 1)
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Keep workers alive across handler panics
    pub fn isolate_panics(mut self, isolate: bool) -> Self {
        self.isolate_panics = isolate;
        self
    }
}
