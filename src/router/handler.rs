//! Handler capability

use std::sync::Arc;

use crate::event::Event;

/// Something that reacts to routed events
///
/// Handlers run synchronously inside the worker of the node they are
/// subscribed at: a slow handler delays every later command on that node.
/// A handler must not wait on work queued to its own node; it may hand it
/// off with [`Router::try_publish`](crate::Router::try_publish) or by
/// spawning a task.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, event: &Event);
}

impl<F> Handler for F
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn handle(&self, event: &Event) {
        self(event)
    }
}

/// Identity comparison of two shared handlers
///
/// Compares the data pointers only; vtable pointers of the same type may
/// differ between codegen units.
pub(crate) fn same_handler(a: &Arc<dyn Handler>, b: &Arc<dyn Handler>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
