//! Per-node worker
//!
//! Every node runs exactly one worker task. The worker is the only owner of
//! the node's table; all access goes through the command queue, so
//! mutations and dispatches at one node never interleave.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::RouterError;
use crate::event::{Event, Pattern, WILDCARD};
use crate::stats::RouterStats;

use super::binding::{Binding, Command, Removal};
use super::config::RouterConfig;
use super::handler::Handler;
use super::node::Router;
use super::subscription::SubscriptionId;

/// A handler panicked and the node is not configured to survive it
struct Stop;

pub(crate) struct Worker {
    table: HashMap<String, Vec<Binding>>,
    config: RouterConfig,
    stats: Arc<RouterStats>,
}

impl Worker {
    /// Start a worker on `runtime` and return the sender for its queue
    pub(crate) fn spawn(
        runtime: &Handle,
        config: &RouterConfig,
        stats: &Arc<RouterStats>,
    ) -> mpsc::Sender<Command> {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let worker = Worker {
            table: HashMap::new(),
            config: config.clone(),
            stats: Arc::clone(stats),
        };

        stats.node_started();
        runtime.spawn(worker.run(rx));
        tx
    }

    /// Drain the queue until every sender is gone or a handler panics
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        tracing::debug!(capacity = self.config.queue_capacity, "Router worker started");

        while let Some(command) = rx.recv().await {
            let result = match command {
                Command::Subscribe {
                    pattern,
                    id,
                    handler,
                } => {
                    self.subscribe(pattern, id, handler).await;
                    Ok(())
                }
                Command::Unsubscribe { pattern, removal } => {
                    self.unsubscribe(pattern, removal).await;
                    Ok(())
                }
                Command::Dispatch(event) => self.dispatch(event).await,
            };

            if result.is_err() {
                tracing::error!(
                    bindings = self.binding_count(),
                    "Router worker stopped by handler panic"
                );
                break;
            }
        }

        // Registrations still held here die with the table
        self.stats.subscriptions_dropped(self.leaf_count());
        self.stats.node_stopped();
        tracing::debug!("Router worker stopped");
    }

    async fn subscribe(
        &mut self,
        pattern: Pattern,
        id: SubscriptionId,
        handler: Arc<dyn Handler>,
    ) {
        let binding = match pattern.rest() {
            None => {
                self.stats.subscription_added();
                Binding::Leaf { id, handler }
            }
            Some(rest) => {
                let router = Router::nested(self.config.clone(), Arc::clone(&self.stats));
                let command = Command::Subscribe {
                    pattern: rest.clone(),
                    id,
                    handler: Arc::clone(&handler),
                };

                if let Err(e) = router.send(command).await {
                    tracing::warn!(pattern = %rest, error = %e, "Failed to build nested route");
                    return;
                }

                Binding::Subtree {
                    id,
                    handler,
                    rest,
                    router,
                }
            }
        };

        tracing::trace!(segment = pattern.head(), subscription = %id, "Binding added");

        self.table
            .entry(pattern.head().to_owned())
            .or_default()
            .push(binding);
    }

    async fn unsubscribe(&mut self, pattern: Pattern, removal: Removal) {
        let head = pattern.head();
        let rest = pattern.rest();

        let Some(bindings) = self.table.get_mut(head) else {
            return;
        };

        let Some(index) = bindings
            .iter()
            .position(|binding| binding.matches(&removal, rest.as_ref()))
        else {
            return;
        };

        let binding = bindings.remove(index);
        if bindings.is_empty() {
            self.table.remove(head);
        }

        tracing::trace!(segment = head, subscription = %binding.id(), "Binding removed");

        match binding {
            Binding::Leaf { .. } => self.stats.subscription_removed(),
            Binding::Subtree {
                rest: own, router, ..
            } => {
                // The child drains this removal, then its queue closes with
                // the router handle dropped here and its worker exits.
                let command = Command::Unsubscribe {
                    pattern: own,
                    removal,
                };
                if let Err(e) = router.send(command).await {
                    tracing::debug!(error = %e, "Nested route already stopped");
                }
            }
        }
    }

    /// One hop: advance the route and run everything bound to its segment
    ///
    /// Exact-segment bindings run first, then wildcard bindings, each in
    /// subscribe order. Subtrees receive their own copy of the event.
    /// Subtrees whose worker has stopped are dropped from the table.
    async fn dispatch(&mut self, mut event: Event) -> Result<(), Stop> {
        self.stats.hop();

        if !event.route_mut().advance() {
            return Ok(());
        }

        let segment = event.route().current();
        let exact = self.table.get(segment);
        let wildcard = if segment == WILDCARD {
            None
        } else {
            self.table.get(WILDCARD)
        };

        tracing::trace!(
            segment = segment,
            depth = ?event.route().position(),
            exact = exact.map_or(0, Vec::len),
            wildcard = wildcard.map_or(0, Vec::len),
            "Dispatching"
        );

        let bindings: Vec<&Binding> = exact.into_iter().chain(wildcard).flatten().collect();
        let mut stopped = Vec::new();

        for binding in bindings {
            match binding {
                Binding::Leaf { id, handler } => self.invoke(*id, handler, &event)?,
                Binding::Subtree {
                    id, rest, router, ..
                } => match router.forward(event.clone()).await {
                    Ok(()) => {}
                    Err(RouterError::WorkerStopped) => {
                        tracing::warn!(
                            pattern = %rest,
                            subscription = %id,
                            "Nested route stopped, removing"
                        );
                        stopped.push(*id);
                    }
                    Err(e) => {
                        tracing::warn!(
                            pattern = %rest,
                            error = %e,
                            "Failed to forward event to nested route"
                        );
                    }
                },
            }
        }

        if !stopped.is_empty() {
            self.prune(&stopped);
        }

        Ok(())
    }

    /// Drop subtree bindings by id
    fn prune(&mut self, ids: &[SubscriptionId]) {
        self.table.retain(|_, bindings| {
            bindings.retain(|binding| {
                !matches!(binding, Binding::Subtree { id, .. } if ids.contains(id))
            });
            !bindings.is_empty()
        });
        self.stats.subtrees_pruned(ids.len() as u64);
    }

    fn invoke(
        &self,
        id: SubscriptionId,
        handler: &Arc<dyn Handler>,
        event: &Event,
    ) -> Result<(), Stop> {
        self.stats.handler_invoked();

        let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler.handle(event))) else {
            return Ok(());
        };

        self.stats.handler_panicked();
        let message = panic_message(panic.as_ref());

        if self.config.isolate_panics {
            tracing::warn!(
                subscription = %id,
                topic = %event.topic(),
                panic = %message,
                "Handler panicked"
            );
            Ok(())
        } else {
            tracing::error!(
                subscription = %id,
                topic = %event.topic(),
                panic = %message,
                "Handler panicked, stopping router worker"
            );
            Err(Stop)
        }
    }

    fn binding_count(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    fn leaf_count(&self) -> u64 {
        self.table
            .values()
            .flatten()
            .filter(|binding| matches!(binding, Binding::Leaf { .. }))
            .count() as u64
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
