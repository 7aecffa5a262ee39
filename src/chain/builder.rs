//! Wiring sugar for chain topologies
//!
//! ```
//! # use std::sync::Arc;
//! # use touch_gestures::chain::connect;
//! # use touch_gestures::dispatch::Dispatcher;
//! # use touch_gestures::filter::NoChangeFilter;
//! # use touch_gestures::gesture::DragRecognizer;
//! let filter = Arc::new(NoChangeFilter::new());
//! let dispatcher = Arc::new(Dispatcher::new());
//! let drag = Arc::new(DragRecognizer::new());
//!
//! connect(filter).to(dispatcher).to(drag);
//! ```

use super::{Chainable, Listener};
use std::sync::Arc;

/// Start wiring at `node`.
pub fn connect<N>(node: Arc<N>) -> Connection<N> {
    Connection { node }
}

/// Cursor positioned on the most recently attached node
pub struct Connection<N> {
    node: Arc<N>,
}

impl<N> Connection<N> {
    /// Queue `next` on the current node and continue from `next`.
    pub fn to<E, M>(self, next: Arc<M>) -> Connection<M>
    where
        N: Chainable<E>,
        M: Listener<E> + 'static,
    {
        self.node.queue(next.clone());
        Connection { node: next }
    }

    /// Queue every node in `nexts` on the current node and continue from the
    /// last one. Returns `None` if `nexts` is empty.
    pub fn to_all<E, M, I>(self, nexts: I) -> Option<Connection<M>>
    where
        N: Chainable<E>,
        M: Listener<E> + 'static,
        I: IntoIterator<Item = Arc<M>>,
    {
        let mut last = None;
        for next in nexts {
            self.node.queue(next.clone());
            last = Some(next);
        }
        last.map(|node| Connection { node })
    }

    /// Queue every listener in `nexts` on the current node and stay on it.
    pub fn fan_out<E, I>(self, nexts: I) -> Self
    where
        N: Chainable<E>,
        I: IntoIterator<Item = Arc<dyn Listener<E>>>,
    {
        for next in nexts {
            self.node.queue(next);
        }
        self
    }

    /// Node the connection currently sits on.
    pub fn node(&self) -> &Arc<N> {
        &self.node
    }

    /// Finish wiring and take the current node.
    pub fn into_node(self) -> Arc<N> {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::NodeKind;
    use crate::filter::NoChangeFilter;
    use crate::input::{Cursor, CursorEvent};
    use parking_lot::Mutex as ParkingMutex;

    #[test]
    fn test_chain_builds_linear_pipeline() {
        let first = Arc::new(NoChangeFilter::new());
        let second = Arc::new(NoChangeFilter::new());
        let seen = Arc::new(ParkingMutex::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            Arc::new(move |e: &CursorEvent| seen.lock().push(e.len()))
        };

        connect(first.clone()).to(second.clone()).to(sink);

        assert_eq!(first.listener_count(), 1);
        assert_eq!(second.listener_count(), 1);
        assert_eq!(second.kind(), NodeKind::Filter);

        first.process(&CursorEvent::new(vec![Cursor::new(1, 0, 0)]));
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn test_fan_out_stays_on_current_node() {
        let root = Arc::new(NoChangeFilter::new());
        let a: Arc<dyn Listener<CursorEvent>> = Arc::new(NoChangeFilter::new());
        let b: Arc<dyn Listener<CursorEvent>> = Arc::new(NoChangeFilter::new());

        let connection = connect(root.clone()).fan_out([a, b]);
        assert!(Arc::ptr_eq(connection.node(), &root));
        assert_eq!(root.listener_count(), 2);
    }

    #[test]
    fn test_to_all_continues_from_last_node() {
        let root = Arc::new(NoChangeFilter::new());
        let a = Arc::new(NoChangeFilter::new());
        let b = Arc::new(NoChangeFilter::new());
        let seen = Arc::new(ParkingMutex::new(0usize));
        let sink = {
            let seen = seen.clone();
            Arc::new(move |_: &CursorEvent| *seen.lock() += 1)
        };

        let tail = connect(root.clone())
            .to_all([a.clone(), b.clone()])
            .map(|connection| connection.to(sink).into_node());
        assert!(tail.is_some());
        assert_eq!(root.listener_count(), 2);
        assert_eq!(a.listener_count(), 0);
        assert_eq!(b.listener_count(), 1);

        root.process(&CursorEvent::new(vec![Cursor::new(1, 0, 0)]));
        assert_eq!(*seen.lock(), 1);
    }

    #[test]
    fn test_to_all_without_nodes() {
        let root = Arc::new(NoChangeFilter::new());
        let none: Vec<Arc<NoChangeFilter>> = Vec::new();
        assert!(connect(root.clone()).to_all(none).is_none());
        assert_eq!(root.listener_count(), 0);
    }

    #[test]
    fn test_into_node_returns_current_node() {
        let root = Arc::new(NoChangeFilter::new());
        let node = connect(root.clone()).into_node();
        assert!(Arc::ptr_eq(&node, &root));
    }
}
