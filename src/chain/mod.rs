//! Chainable processing nodes
//!
//! Every node in a pipeline consumes events through [`Listener::process`] and
//! forwards zero or more events to the listeners queued on it. Topologies are
//! built explicitly by the application with `queue`/`dequeue` or the
//! [`connect`] builder.

pub mod builder;

pub use builder::{connect, Connection};

use parking_lot::Mutex as ParkingMutex;
use std::fmt;
use std::sync::Arc;

/// Consumer side of a chain node
pub trait Listener<E>: Send + Sync {
    fn process(&self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn process(&self, event: &E) {
        self(event)
    }
}

/// Types of chain nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Denoising or gating stage
    Filter,
    /// Cursor-to-target partitioning
    Dispatcher,
    /// Gesture state machine
    Recognizer,
    /// Hand-off onto the scheduler thread
    Boundary,
    /// Frame recorder
    Recorder,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Filter => write!(f, "filter"),
            NodeKind::Dispatcher => write!(f, "dispatcher"),
            NodeKind::Recognizer => write!(f, "recognizer"),
            NodeKind::Boundary => write!(f, "boundary"),
            NodeKind::Recorder => write!(f, "recorder"),
        }
    }
}

/// Producer side of a chain node
///
/// `E` is the type of event the node emits downstream.
pub trait Chainable<E> {
    fn kind(&self) -> NodeKind;

    fn listeners(&self) -> &Listeners<E>;

    /// Attach a downstream listener.
    fn queue(&self, next: Arc<dyn Listener<E>>) {
        self.listeners().queue(next);
    }

    /// Detach a downstream listener. Returns whether it was attached.
    fn dequeue(&self, next: &Arc<dyn Listener<E>>) -> bool {
        self.listeners().dequeue(next)
    }

    fn listener_count(&self) -> usize {
        self.listeners().len()
    }
}

/// Fan-out list of downstream listeners
pub struct Listeners<E> {
    inner: ParkingMutex<Vec<Arc<dyn Listener<E>>>>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Listeners<E> {
    /// Creates an empty listener list.
    pub fn new() -> Self {
        Self {
            inner: ParkingMutex::new(Vec::new()),
        }
    }

    /// Append `next` to the fan-out.
    pub fn queue(&self, next: Arc<dyn Listener<E>>) {
        self.inner.lock().push(next);
    }

    /// Remove `next`, compared by pointer. Returns whether it was queued.
    pub fn dequeue(&self, next: &Arc<dyn Listener<E>>) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.len();
        inner.retain(|l| !same_listener(l, next));
        inner.len() != before
    }

    /// Deliver `event` to every listener queued at the time of the call.
    ///
    /// The list is snapshotted first, so listeners may queue or dequeue while
    /// being called.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Arc<dyn Listener<E>>> = self.inner.lock().clone();
        for listener in snapshot {
            listener.process(event);
        }
    }

    /// Number of queued listeners.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

fn same_listener<E>(a: &Arc<dyn Listener<E>>, b: &Arc<dyn Listener<E>>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_fans_out_to_all_listeners() {
        let listeners: Listeners<u32> = Listeners::new();
        let total = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let total = total.clone();
            listeners.queue(Arc::new(move |v: &u32| {
                total.fetch_add(*v as usize, Ordering::SeqCst);
            }));
        }

        listeners.emit(&2);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_dequeue_by_identity() {
        let listeners: Listeners<u32> = Listeners::new();
        let a: Arc<dyn Listener<u32>> = Arc::new(|_: &u32| {});
        let b: Arc<dyn Listener<u32>> = Arc::new(|_: &u32| {});
        listeners.queue(a.clone());
        listeners.queue(b.clone());

        assert!(listeners.dequeue(&a));
        assert!(!listeners.dequeue(&a));
        assert_eq!(listeners.len(), 1);
        assert!(listeners.dequeue(&b));
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listener_may_dequeue_itself_during_emit() {
        let listeners: Arc<Listeners<u32>> = Arc::new(Listeners::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let slot: Arc<ParkingMutex<Option<Arc<dyn Listener<u32>>>>> =
            Arc::new(ParkingMutex::new(None));

        let me: Arc<dyn Listener<u32>> = {
            let listeners = listeners.clone();
            let calls = calls.clone();
            let slot = slot.clone();
            Arc::new(move |_: &u32| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(me) = slot.lock().take() {
                    listeners.dequeue(&me);
                }
            })
        };
        *slot.lock() = Some(me.clone());
        listeners.queue(me);

        listeners.emit(&1);
        listeners.emit(&1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_node_kind_display() {
        assert_eq!(NodeKind::Dispatcher.to_string(), "dispatcher");
        assert_eq!(NodeKind::Boundary.to_string(), "boundary");
    }
}
