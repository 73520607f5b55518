//! Router node handle
//!
//! [`Router`] is the public face of one trie node: every operation becomes a
//! [`Command`] on the node's queue and returns once the queue has accepted
//! it, never waiting for the command's effects.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::{Result, RouterError};
use crate::event::{Event, Pattern};
use crate::stats::{RouterStats, StatsSnapshot};

use super::binding::{Command, Removal};
use super::config::RouterConfig;
use super::handler::Handler;
use super::subscription::{Subscription, SubscriptionId};
use super::worker::Worker;

/// Topic router
///
/// A default-constructed router is usable as-is: its worker starts on the
/// first operation, on the tokio runtime of the caller. Share a router
/// between tasks with `Arc<Router>`; dropping the last handle lets the
/// worker finish the queued commands and exit.
///
/// The worker stays bound to the runtime that started it. Once that runtime
/// shuts down the worker is gone for good and every later operation fails
/// with [`RouterError::WorkerStopped`]; create routers on a runtime that
/// outlives them.
///
/// # Example
/// ```no_run
/// use event_router::{Event, Router};
///
/// # async fn example() -> event_router::Result<()> {
/// let router = Router::new();
///
/// router
///     .subscribe("orders.*.created", |event: &Event| {
///         println!("{} -> {:?}", event.topic(), event.payload_as::<u64>());
///     })
///     .await?;
///
/// // Returns as soon as the event is queued
/// router.publish("orders.eu.created", 42u64).await?;
/// # Ok(())
/// # }
/// ```
pub struct Router {
    config: RouterConfig,
    stats: Arc<RouterStats>,
    queue: OnceLock<mpsc::Sender<Command>>,
}

impl Router {
    /// Create a router with default configuration
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create a router with custom configuration
    pub fn with_config(config: RouterConfig) -> Self {
        Self::nested(config, Arc::new(RouterStats::new()))
    }

    /// Node created under a parent; shares the parent's config and stats
    pub(crate) fn nested(config: RouterConfig, stats: Arc<RouterStats>) -> Self {
        Self {
            config,
            stats,
            queue: OnceLock::new(),
        }
    }

    /// Create a router and subscribe each `(pattern, handler)` pair in order
    ///
    /// Equivalent to one [`subscribe_shared`](Self::subscribe_shared) per
    /// pair. Returns the router with the tokens in the same order.
    pub async fn with_handlers<I, P>(pairs: I) -> Result<(Self, Vec<Subscription>)>
    where
        I: IntoIterator<Item = (P, Arc<dyn Handler>)>,
        P: AsRef<str>,
    {
        let router = Self::new();
        let mut subscriptions = Vec::new();

        for (pattern, handler) in pairs {
            let subscription = router.subscribe_dyn(pattern.as_ref(), handler).await?;
            subscriptions.push(subscription);
        }

        Ok((router, subscriptions))
    }

    /// Get the router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Counters for this router and every node nested under it
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Whether the worker has been started and is still accepting commands
    pub fn is_running(&self) -> bool {
        self.queue.get().is_some_and(|tx| !tx.is_closed())
    }

    /// Subscribe a handler to a dot-delimited pattern
    ///
    /// `*` matches exactly one segment at its depth. A pattern also matches
    /// every topic that extends it: `first` fires for `first.second`.
    pub async fn subscribe<H: Handler>(&self, pattern: &str, handler: H) -> Result<Subscription> {
        self.subscribe_dyn(pattern, Arc::new(handler)).await
    }

    /// Subscribe a shared handler
    ///
    /// Keep a clone of the `Arc` to remove it later with
    /// [`unsubscribe_handler`](Self::unsubscribe_handler).
    pub async fn subscribe_shared<H: Handler>(
        &self,
        pattern: &str,
        handler: Arc<H>,
    ) -> Result<Subscription> {
        self.subscribe_dyn(pattern, handler).await
    }

    async fn subscribe_dyn(
        &self,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<Subscription> {
        let pattern = Pattern::parse(pattern);
        let id = SubscriptionId::next();

        self.send(Command::Subscribe {
            pattern: pattern.clone(),
            id,
            handler,
        })
        .await?;

        tracing::debug!(pattern = %pattern, subscription = %id, "Handler subscribed");

        Ok(Subscription::new(id, pattern))
    }

    /// Remove the registration a [`Subscription`] was issued for
    ///
    /// Unknown or already removed subscriptions are ignored.
    pub async fn unsubscribe(&self, subscription: &Subscription) -> Result<()> {
        self.send(Command::Unsubscribe {
            pattern: subscription.pattern().clone(),
            removal: Removal::Id(subscription.id()),
        })
        .await?;

        tracing::debug!(
            pattern = %subscription.pattern(),
            subscription = %subscription.id(),
            "Unsubscribe queued"
        );

        Ok(())
    }

    /// Remove the first registration of `handler` under `pattern`
    ///
    /// Handlers are identified by their `Arc` allocation. If the same
    /// handler was subscribed several times, one occurrence is removed per
    /// call. Patterns or handlers that are not registered are ignored.
    pub async fn unsubscribe_handler<H: Handler>(
        &self,
        pattern: &str,
        handler: &Arc<H>,
    ) -> Result<()> {
        let handler: Arc<dyn Handler> = Arc::clone(handler) as Arc<dyn Handler>;
        let pattern = Pattern::parse(pattern);

        self.send(Command::Unsubscribe {
            pattern: pattern.clone(),
            removal: Removal::Handler(handler),
        })
        .await?;

        tracing::debug!(pattern = %pattern, "Unsubscribe queued");

        Ok(())
    }

    /// Publish a payload on a dot-delimited topic
    ///
    /// Returns once the event is queued on this router; handlers run later
    /// on the workers of the nodes they are subscribed at. Topics nothing is
    /// subscribed to are dropped silently.
    ///
    /// A topic segment that is literally `*` is matched by the wildcard
    /// bindings at that depth once, like any other segment; they are not
    /// run a second time as exact matches.
    pub async fn publish<T: Any + Send + Sync>(&self, topic: &str, payload: T) -> Result<()> {
        self.forward(Event::new(topic, payload)).await?;
        self.stats.event_published();
        Ok(())
    }

    /// Publish without waiting for queue capacity
    ///
    /// Safe to call from inside a handler, including one running on this
    /// router's own worker. Fails with [`RouterError::QueueFull`] instead of
    /// waiting.
    pub fn try_publish<T: Any + Send + Sync>(&self, topic: &str, payload: T) -> Result<()> {
        let command = Command::Dispatch(Event::new(topic, payload));

        self.sender()?.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => RouterError::QueueFull,
            TrySendError::Closed(_) => RouterError::WorkerStopped,
        })?;

        self.stats.event_published();
        Ok(())
    }

    /// Hand an event to this node; the worker advances its route
    pub(crate) async fn forward(&self, event: Event) -> Result<()> {
        self.send(Command::Dispatch(event)).await
    }

    pub(crate) async fn send(&self, command: Command) -> Result<()> {
        self.sender()?
            .send(command)
            .await
            .map_err(|_| RouterError::WorkerStopped)
    }

    /// Queue sender, starting the worker exactly once on first use
    fn sender(&self) -> Result<&mpsc::Sender<Command>> {
        if let Some(tx) = self.queue.get() {
            return Ok(tx);
        }

        let runtime = Handle::try_current().map_err(|_| RouterError::NoRuntime)?;
        Ok(self
            .queue
            .get_or_init(|| Worker::spawn(&runtime, &self.config, &self.stats)))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::sync::mpsc::UnboundedSender;
    use tokio::sync::Barrier;
    use tokio::time::timeout;
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    /// One handler invocation as observed by a test
    #[derive(Debug, Clone, PartialEq)]
    struct Hit {
        label: &'static str,
        segments: Vec<String>,
        current: String,
        payload: Option<&'static str>,
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn record(tx: &UnboundedSender<Hit>, label: &'static str) -> impl Handler {
        let tx = tx.clone();
        move |event: &Event| {
            let _ = tx.send(Hit {
                label,
                segments: event.route().segments().to_vec(),
                current: event.route().current().to_owned(),
                payload: event.payload_as::<&'static str>().copied(),
            });
        }
    }

    /// Wait for exactly `n` hits, then make sure no more arrive
    async fn expect_hits(rx: &mut mpsc::UnboundedReceiver<Hit>, n: usize) -> Vec<Hit> {
        let mut hits = Vec::with_capacity(n);
        for _ in 0..n {
            let hit = timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timed out waiting for handler")
                .expect("handler channel closed");
            hits.push(hit);
        }

        let extra = timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(
            !matches!(extra, Ok(Some(_))),
            "unexpected extra invocation: {:?}",
            extra
        );

        hits
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_handler_matching() {
        init_tracing();

        let cases: &[(&str, &[&str], &str, usize)] = &[
            ("top level", &["event"], "event", 1),
            ("top level wildcard", &["*"], "event", 1),
            ("second level", &["first.second"], "first.second", 1),
            ("second level wildcard first", &["*.second"], "first.second", 1),
            ("second level wildcard second", &["first.*"], "first.second", 1),
            ("two handlers", &["event", "event"], "event", 2),
            (
                "three levels of wildcards",
                &["*", "*.*", "*.*.*"],
                "first.second.third",
                3,
            ),
            ("partial subscribe", &["first"], "first.second.third", 1),
            ("partial publish", &["first.second.third"], "first", 0),
            (
                "branching handlers",
                &[
                    "first",
                    "first.*",
                    "first.second",
                    "first.*.third",
                    "first.second.third",
                ],
                "first.second.third",
                5,
            ),
            ("no matching handlers", &["first"], "none", 0),
            ("no handlers", &[], "none", 0),
        ];

        for &(desc, patterns, topic, expected) in cases {
            let router = Router::new();
            let (tx, mut rx) = mpsc::unbounded_channel();
            let handler = Arc::new(record(&tx, desc));

            for pattern in patterns {
                assert_ok!(router.subscribe_shared(pattern, Arc::clone(&handler)).await);
            }
            assert_ok!(router.publish(topic, "payload").await);

            let hits = expect_hits(&mut rx, expected).await;
            let expected_segments: Vec<String> = topic.split('.').map(String::from).collect();
            for hit in hits {
                assert_eq!(hit.segments, expected_segments, "{}", desc);
                assert_eq!(hit.payload, Some("payload"), "{}", desc);
            }
        }
    }

    #[tokio::test]
    async fn test_wildcard_route_contents() {
        let router = Router::default();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.subscribe("*", record(&tx, "any")).await.unwrap();
        router.publish("event", "some payload").await.unwrap();

        let hits = expect_hits(&mut rx, 1).await;
        assert_eq!(hits[0].segments, vec!["event".to_string()]);
        assert_eq!(hits[0].current, "event");
        assert_eq!(hits[0].payload, Some("some payload"));
    }

    #[tokio::test]
    async fn test_current_segment_matches_handler_depth() {
        let router = Router::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.subscribe("first", record(&tx, "1")).await.unwrap();
        router.subscribe("first.second", record(&tx, "2")).await.unwrap();
        router
            .subscribe("first.second.third", record(&tx, "3"))
            .await
            .unwrap();
        router.publish("first.second.third", "p").await.unwrap();

        let mut hits = expect_hits(&mut rx, 3).await;
        hits.sort_by_key(|hit| hit.label);

        let current: Vec<&str> = hits.iter().map(|hit| hit.current.as_str()).collect();
        assert_eq!(current, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_exact_handlers_fire_before_wildcard_handlers() {
        let router = Router::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.subscribe("*", record(&tx, "wild-1")).await.unwrap();
        router.subscribe("event", record(&tx, "exact-1")).await.unwrap();
        router.subscribe("*", record(&tx, "wild-2")).await.unwrap();
        router.subscribe("event", record(&tx, "exact-2")).await.unwrap();
        router.publish("event", "p").await.unwrap();

        let order: Vec<&str> = expect_hits(&mut rx, 4)
            .await
            .iter()
            .map(|hit| hit.label)
            .collect();
        assert_eq!(order, vec!["exact-1", "exact-2", "wild-1", "wild-2"]);
    }

    #[tokio::test]
    async fn test_literal_wildcard_segment_fires_once() {
        let router = Router::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.subscribe("*", record(&tx, "any")).await.unwrap();
        router.publish("*", "p").await.unwrap();

        expect_hits(&mut rx, 1).await;
    }

    #[tokio::test]
    async fn test_same_node_publishes_stay_in_order() {
        let router = Router::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router
            .subscribe("tick", move |event: &Event| {
                let _ = tx.send(*event.payload_as::<u32>().unwrap());
            })
            .await
            .unwrap();

        for i in 0..20u32 {
            router.publish("tick", i).await.unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..20 {
            seen.push(timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap());
        }
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_unsubscribe_handler() {
        let cases: &[(&str, &[&str], &[&str], &str, [usize; 2])] = &[
            ("single handler", &["first"], &["first"], "first", [1, 0]),
            ("multiple handlers", &["first", "first"], &["first"], "first", [2, 1]),
            ("nested handler", &["first.second"], &["first.second"], "first.second", [1, 0]),
            ("no matching handlers", &["first"], &["second"], "second", [0, 0]),
            ("no handlers", &[], &["first"], "first", [0, 0]),
        ];

        for &(desc, subscribes, unsubscribes, topic, expected) in cases {
            let router = Router::new();
            let (tx, mut rx) = mpsc::unbounded_channel();
            let handler = Arc::new(record(&tx, desc));

            for pattern in subscribes {
                router.subscribe_shared(pattern, Arc::clone(&handler)).await.unwrap();
            }

            router.publish(topic, "p").await.unwrap();
            expect_hits(&mut rx, expected[0]).await;

            for pattern in unsubscribes {
                assert_ok!(router.unsubscribe_handler(pattern, &handler).await);
            }

            router.publish(topic, "p").await.unwrap();
            expect_hits(&mut rx, expected[1]).await;
        }
    }

    #[tokio::test]
    async fn test_unsubscribe_handler_ignores_other_handlers() {
        let router = Router::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscribed = Arc::new(record(&tx, "subscribed"));
        let stranger = Arc::new(record(&tx, "stranger"));

        router.subscribe_shared("first.second", subscribed).await.unwrap();
        router.unsubscribe_handler("first.second", &stranger).await.unwrap();
        // Same handler, different pattern depth
        router.unsubscribe_handler("first", &stranger).await.unwrap();

        router.publish("first.second", "p").await.unwrap();
        let hits = expect_hits(&mut rx, 1).await;
        assert_eq!(hits[0].label, "subscribed");
    }

    #[tokio::test]
    async fn test_unsubscribe_by_token_removes_one_registration() {
        let router = Router::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handler = Arc::new(record(&tx, "dup"));

        let first = router.subscribe_shared("a.b", Arc::clone(&handler)).await.unwrap();
        let second = router.subscribe_shared("a.b", Arc::clone(&handler)).await.unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.pattern().to_string(), "a.b");

        router.unsubscribe(&second).await.unwrap();
        router.publish("a.b", "p").await.unwrap();
        expect_hits(&mut rx, 1).await;

        // Removing the same token again changes nothing
        router.unsubscribe(&second).await.unwrap();
        router.publish("a.b", "p").await.unwrap();
        expect_hits(&mut rx, 1).await;

        router.unsubscribe(&first).await.unwrap();
        router.publish("a.b", "p").await.unwrap();
        expect_hits(&mut rx, 0).await;
    }

    #[tokio::test]
    async fn test_with_handlers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pairs: Vec<(&str, Arc<dyn Handler>)> = vec![
            ("first", Arc::new(record(&tx, "first")) as Arc<dyn Handler>),
            ("first.second", Arc::new(record(&tx, "second")) as Arc<dyn Handler>),
            (
                "first.second.third",
                Arc::new(record(&tx, "third")) as Arc<dyn Handler>,
            ),
        ];

        let (router, subscriptions) = Router::with_handlers(pairs).await.unwrap();
        assert_eq!(subscriptions.len(), 3);
        assert_eq!(subscriptions[2].pattern().depth(), 3);

        router.publish("first.second.third", "p").await.unwrap();
        expect_hits(&mut rx, 3).await;
    }

    #[tokio::test]
    async fn test_nested_workers_exit_after_unsubscribe() {
        init_tracing();

        let router = Router::new();
        let subscription = router.subscribe("a.b.c", |_: &Event| {}).await.unwrap();

        // Root plus one node per extra segment
        wait_until(|| router.stats().nodes_started == 3).await;
        wait_until(|| router.stats().subscriptions == 1).await;

        router.unsubscribe(&subscription).await.unwrap();

        wait_until(|| router.stats().nodes_stopped == 2).await;
        wait_until(|| router.stats().subscriptions == 0).await;
        assert_eq!(router.stats().active_nodes(), 1);
        assert!(router.is_running());
    }

    #[tokio::test]
    async fn test_stats() {
        let router = Router::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.subscribe("first.second", record(&tx, "h")).await.unwrap();
        router.publish("first.second", "p").await.unwrap();
        router.publish("unmatched", "p").await.unwrap();
        expect_hits(&mut rx, 1).await;

        let stats = router.stats();
        assert_eq!(stats.events_published, 2);
        assert_eq!(stats.handlers_invoked, 1);
        assert_eq!(stats.subscriptions, 1);
        assert_eq!(stats.handler_panics, 0);
        // root twice, child once
        assert_eq!(stats.hops, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_first_use_starts_one_worker() {
        for _ in 0..25 {
            let router = Arc::new(Router::new());
            let barrier = Arc::new(Barrier::new(8));
            let mut tasks = Vec::new();

            for i in 0..8 {
                let router = Arc::clone(&router);
                let barrier = Arc::clone(&barrier);
                tasks.push(tokio::spawn(async move {
                    barrier.wait().await;
                    router.subscribe(&format!("topic{}", i), |_: &Event| {}).await
                }));
            }
            for task in tasks {
                assert_ok!(task.await.unwrap());
            }

            assert_eq!(router.stats().nodes_started, 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publishers() {
        let router = Arc::new(Router::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        router.subscribe("load.*", record(&tx, "load")).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..4 {
            let router = Arc::clone(&router);
            tasks.push(tokio::spawn(async move {
                for j in 0..25 {
                    let topic = format!("load.p{}-{}", i, j);
                    router.publish(&topic, "p").await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        expect_hits(&mut rx, 100).await;
    }

    #[tokio::test]
    async fn test_handler_panic_stops_worker() {
        let router = Router::new();

        router
            .subscribe("boom", |_: &Event| panic!("handler failure"))
            .await
            .unwrap();
        router.publish("boom", ()).await.unwrap();

        wait_until(|| !router.is_running()).await;
        assert_eq!(router.stats().handler_panics, 1);
        assert_eq!(router.stats().nodes_stopped, 1);

        let result = router.publish("boom", ()).await;
        assert_eq!(assert_err!(result), RouterError::WorkerStopped);
    }

    #[tokio::test]
    async fn test_stopped_nested_route_is_pruned() {
        let router = Router::new();
        let subscription = router
            .subscribe("a.b", |_: &Event| panic!("handler failure"))
            .await
            .unwrap();

        router.publish("a.b", ()).await.unwrap();

        // The child's registration dies with its worker
        wait_until(|| router.stats().nodes_stopped == 1).await;
        wait_until(|| router.stats().subscriptions == 0).await;

        // The root notices the closed queue on a later hop and drops the route
        for _ in 0..200 {
            router.publish("a.b", ()).await.unwrap();
            if router.stats().subtrees_pruned == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(router.stats().subtrees_pruned, 1);

        router.unsubscribe(&subscription).await.unwrap();
        router.publish("a.b", ()).await.unwrap();

        let stats = router.stats();
        assert_eq!(stats.subscriptions, 0);
        assert_eq!(stats.handler_panics, 1);
        assert_eq!(stats.subtrees_pruned, 1);
        assert!(router.is_running());
    }

    #[tokio::test]
    async fn test_isolated_handler_panic_keeps_dispatching() {
        let router = Router::with_config(RouterConfig::default().isolate_panics(true));
        let (tx, mut rx) = mpsc::unbounded_channel();

        router
            .subscribe("boom", |_: &Event| panic!("handler failure"))
            .await
            .unwrap();
        router.subscribe("boom", record(&tx, "after")).await.unwrap();

        router.publish("boom", "p").await.unwrap();
        router.publish("boom", "p").await.unwrap();

        expect_hits(&mut rx, 2).await;
        assert_eq!(router.stats().handler_panics, 2);
        assert!(router.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_try_publish_reports_full_queue() {
        let router = Router::with_config(RouterConfig::default().queue_capacity(1));
        let (started_tx, mut started_rx) = mpsc::unbounded_channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);

        router
            .subscribe("slow", move |_: &Event| {
                let _ = started_tx.send(());
                let _ = release_rx.lock().unwrap().recv();
            })
            .await
            .unwrap();
        router.publish("slow", ()).await.unwrap();

        // The worker is now stuck in the handler with an empty queue
        timeout(Duration::from_secs(2), started_rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_ok!(router.try_publish("other", ()));
        assert_eq!(
            assert_err!(router.try_publish("other", ())),
            RouterError::QueueFull
        );

        release_tx.send(()).unwrap();
        wait_until(|| router.stats().hops == 2).await;
        assert_eq!(router.stats().events_published, 2);
    }

    #[tokio::test]
    async fn test_try_publish_from_handler() {
        let router = Arc::new(Router::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let inner = Arc::clone(&router);
        router
            .subscribe("ping", move |_: &Event| {
                inner.try_publish("pong", "from ping").unwrap();
            })
            .await
            .unwrap();
        router.subscribe("pong", record(&tx, "pong")).await.unwrap();

        router.publish("ping", "p").await.unwrap();

        let hits = expect_hits(&mut rx, 1).await;
        assert_eq!(hits[0].payload, Some("from ping"));
    }

    #[test]
    fn test_no_runtime() {
        let router = Router::new();

        assert_eq!(
            assert_err!(router.try_publish("event", ())),
            RouterError::NoRuntime
        );
        assert!(!router.is_running());

        // Lazily starts once a runtime is available
        tokio_test::block_on(async {
            assert_ok!(router.subscribe("event", |_: &Event| {}).await);
            assert!(router.is_running());
        });

        // The worker died with the runtime it was started on
        assert!(!router.is_running());
        tokio_test::block_on(async {
            assert_eq!(
                assert_err!(router.publish("event", ()).await),
                RouterError::WorkerStopped
            );
        });
    }
}
