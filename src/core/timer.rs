//! Deferred jobs polled by the workspace
//!
//! Nothing runs in the background: callers hand in the current instant and
//! collect whatever has come due.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    ready_at: Instant,
    item: T,
}

/// Queue of items that become due at a given instant
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    pending: Vec<Pending<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn schedule(&mut self, item: T, ready_at: Instant) {
        self.pending.push(Pending { ready_at, item });
    }

    /// Schedule `item` to come due `delay` after `now`
    pub fn schedule_in(&mut self, item: T, now: Instant, delay: Duration) {
        self.schedule(item, now + delay);
    }

    /// Remove and return every item due at `now`, in scheduling order
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.ready_at <= now);
        self.pending = waiting;
        due.into_iter().map(|p| p.item).collect()
    }

    /// Drop every waiting item matching `pred`; returns how many were dropped
    pub fn cancel<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let before = self.pending.len();
        self.pending.retain(|p| !pred(&p.item));
        before - self.pending.len()
    }

    /// Earliest instant at which something comes due
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.ready_at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_before_deadline() {
        let start = Instant::now();
        let mut q = DeferredQueue::default();
        q.schedule_in("a", start, Duration::from_secs(3));
        assert!(q.drain_due(start).is_empty());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_drain_keeps_order_and_rest() {
        let start = Instant::now();
        let mut q = DeferredQueue::default();
        q.schedule_in(1, start, Duration::from_millis(10));
        q.schedule_in(2, start, Duration::from_secs(60));
        q.schedule_in(3, start, Duration::ZERO);

        let due = q.drain_due(start + Duration::from_millis(10));
        assert_eq!(due, vec![1, 3]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(start + Duration::from_secs(60)));
    }

    #[test]
    fn test_cancel_drops_matching() {
        let start = Instant::now();
        let mut q = DeferredQueue::default();
        q.schedule_in(7, start, Duration::from_secs(1));
        q.schedule_in(8, start, Duration::from_secs(1));
        q.schedule_in(7, start, Duration::from_secs(2));

        assert_eq!(q.cancel(|id| *id == 7), 2);
        assert_eq!(q.drain_due(start + Duration::from_secs(5)), vec![8]);
        assert_eq!(q.cancel(|id| *id == 7), 0);
    }

    #[test]
    fn test_empty_queue() {
        let mut q = DeferredQueue::<u32>::default();
        assert!(q.is_empty());
        assert!(q.next_due().is_none());
        assert!(q.drain_due(Instant::now()).is_empty());
    }
}
