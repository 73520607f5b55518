//! Topic trie routing
//!
//! A [`Router`] is one node of a segment trie. Each node owns a table from
//! segment to the ordered bindings subscribed under it, and a single worker
//! task that is the only code touching that table.
//!
//! # Architecture
//!
//! ```text
//!  subscribe("first.*.third", h)
//!
//!          root Router
//!     ┌─────────────────────┐
//!     │ "first" => [Subtree]│──► child Router
//!     └─────────────────────┘   ┌──────────────────┐
//!                               │ "*" => [Subtree] │──► child Router
//!                               └──────────────────┘   ┌─────────────────┐
//!                                                      │ "third" => [h]  │
//!                                                      └─────────────────┘
//!
//!  publish("first.second.third")
//!     root: advance → "first"  → exact bindings, then "*" bindings
//!     child: advance → "second" → no exact, "*" matches → forward
//!     child: advance → "third"  → h(event)
//! ```
//!
//! Every multi-segment subscription builds its own chain of nodes; nothing
//! is merged. Each hop is a command on the next node's queue, so the
//! branches of one publish run on independent workers with no ordering
//! between them. Within one node, commands run strictly in arrival order
//! and exact-segment bindings always fire before wildcard bindings.
//!
//! # Removal
//!
//! [`Router::unsubscribe`] takes the [`Subscription`] token returned by
//! `subscribe`; [`Router::unsubscribe_handler`] removes by `Arc` identity.
//! Removing a subtree drops the child router, whose worker exits once its
//! queue is drained.

pub mod config;
pub mod handler;
pub mod subscription;

mod binding;
mod node;
mod worker;

pub use config::RouterConfig;
pub use handler::Handler;
pub use node::Router;
pub use subscription::{Subscription, SubscriptionId};
