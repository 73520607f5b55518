//! # event-router
//!
//! In-process publish/subscribe over dot-delimited topics.
//!
//! Handlers subscribe to patterns such as `orders.*.created`; publishers
//! name a topic such as `orders.eu.created` and a payload. A pattern
//! matches a topic segment by segment, `*` matching exactly one segment,
//! and a pattern also matches every longer topic it is a prefix of.
//!
//! - [`router`]: the trie of per-node workers and the public [`Router`]
//! - [`event`]: [`Event`], [`Route`] and [`Pattern`]
//! - [`stats`]: counters shared by a router tree
//!
//! Publishing never waits for handlers: it returns once the event is queued
//! on the root node.

pub mod error;
pub mod event;
pub mod router;
pub mod stats;

pub use error::{Result, RouterError};
pub use event::{Event, Pattern, Payload, Route, WILDCARD};
pub use router::{Handler, Router, RouterConfig, Subscription, SubscriptionId};
pub use stats::{RouterStats, StatsSnapshot};
