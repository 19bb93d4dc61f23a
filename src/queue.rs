/*!
 * Blocking Message Queue
 *
 * MPMC FIFO queue with predicate-checked blocking waits.
 * Built for handing parsed messages from a background thread
 * to a consumer loop without busy-polling.
 */

use log::trace;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Duration;

/// Thread-safe FIFO queue with blocking consumption.
///
/// Any number of producers and consumers may share one instance (typically
/// behind an `Arc`). Every operation takes a brief critical section on a
/// single internal mutex; `wait` and `wait_timeout` are the only operations
/// that can block beyond that.
///
/// # Notification
///
/// `push` and `push_all` wake **at most one** parked consumer per call
/// (`notify_one`), never all of them. With several consumers sharing a
/// queue this avoids a thundering herd waking for a single item, but it
/// also means a rapid burst of pushes without intervening pops wakes only
/// one consumer. Callers that need every waiter woken should push once per
/// expected waiter or use a broadcast primitive instead.
///
/// # Ordering
///
/// Items pushed from one producer thread are observed in that producer's
/// program order. Interleaving across producers is unspecified.
pub struct MessageQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> MessageQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Block the calling thread until the queue is non-empty.
    ///
    /// Returns immediately if items are already present. The condvar wait
    /// re-checks the non-empty predicate, so a spurious wakeup never
    /// returns control with an empty queue.
    pub fn wait(&self) {
        let mut items = self.items.lock();
        while items.is_empty() {
            self.available.wait(&mut items);
        }
    }

    /// Block until the queue is non-empty or the timeout elapses.
    ///
    /// Returns `true` if the queue is non-empty at return (an item arrived
    /// in time, or was already present), `false` on timeout with an empty
    /// queue. A timeout is a normal outcome, not an error.
    ///
    /// Uses a single deadline-bounded condvar wait, no polling.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut items = self.items.lock();
        if items.is_empty() {
            self.available
                .wait_while_for(&mut items, |items| items.is_empty(), timeout);
        }

        let ready = !items.is_empty();
        if !ready {
            trace!("queue wait timed out after {:?}", timeout);
        }
        ready
    }

    /// Whether the queue currently holds zero items.
    ///
    /// Snapshot under the lock; another thread may change the answer the
    /// instant this returns.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Current item count. Same staleness caveat as [`is_empty`](Self::is_empty).
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Remove and return the front item.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Checking emptiness is deliberately the
    /// caller's job (gate with [`wait`](Self::wait), [`wait_timeout`](Self::wait_timeout)
    /// or [`is_empty`](Self::is_empty)); use [`try_pop`](Self::try_pop) for
    /// a non-panicking variant.
    pub fn pop(&self) -> T {
        self.items
            .lock()
            .pop_front()
            .expect("pop() called on an empty MessageQueue")
    }

    /// Remove and return the front item, or `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Remove and return all items in FIFO order, leaving the queue empty.
    ///
    /// Never blocks; returns an empty vec if there is nothing queued.
    pub fn pop_all(&self) -> Vec<T> {
        let mut items = self.items.lock();
        Vec::from(std::mem::take(&mut *items))
    }

    /// Append one item and wake at most one parked consumer.
    pub fn push(&self, item: T) {
        let mut items = self.items.lock();
        items.push_back(item);
        self.available.notify_one();
    }

    /// Append one item without waking anyone.
    ///
    /// A consumer already parked in [`wait`](Self::wait) stays parked until
    /// a later notifying push arrives (or its timeout elapses).
    pub fn push_quiet(&self, item: T) {
        self.items.lock().push_back(item);
    }

    /// Append all items, preserving their order, then wake at most one
    /// parked consumer.
    pub fn push_all(&self, new_items: impl IntoIterator<Item = T>) {
        let mut items = self.items.lock();
        items.extend(new_items);
        self.available.notify_one();
    }

    /// Append all items, preserving their order, without waking anyone.
    pub fn push_all_quiet(&self, new_items: impl IntoIterator<Item = T>) {
        self.items.lock().extend(new_items);
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
