//! Router error types
//!
//! Unmatched topics and unknown subscriptions are not errors; only failures
//! to hand a command to a node's queue are reported.

use thiserror::Error;

/// Error type for router operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterError {
    /// The worker had to be started outside of a tokio runtime
    #[error("no tokio runtime available to start the router worker")]
    NoRuntime,

    /// The node's worker has exited and no longer accepts commands
    #[error("router worker has stopped")]
    WorkerStopped,

    /// The node's queue is at capacity (non-waiting publish only)
    #[error("router queue is full")]
    QueueFull,
}

/// Result alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;
