//! Overlap guard: at most one in-flight poll per aggregator.
//!
//! The in-flight flag is acquired before any external work starts and
//! released through an RAII guard, so a panic or a cancelled caller can
//! never leave the aggregator wedged. Callers that lose the race get the
//! last-good snapshot with zero new work; callers that arrive before the
//! first poll has ever completed wait for that poll's result instead of
//! fabricating an empty one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

pub struct PollGuard<T> {
    in_flight: AtomicBool,
    last_good: RwLock<Option<Arc<T>>>,
    // Ticks once per release so waiters re-check the slot.
    completions: watch::Sender<u64>,
}

impl<T> PollGuard<T> {
    pub fn new() -> Self {
        let (completions, _) = watch::channel(0);
        Self {
            in_flight: AtomicBool::new(false),
            last_good: RwLock::new(None),
            completions,
        }
    }

    /// Most recent completed snapshot, if any poll has ever finished.
    pub fn last_good(&self) -> Option<Arc<T>> {
        self.last_good.read().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `work` unless a poll is already in flight.
    ///
    /// Exactly one concurrent caller executes `work`; the rest return the
    /// last-good snapshot, or await the in-flight result when none exists
    /// yet. If the working caller is cancelled mid-poll, a waiter takes
    /// over the slot and polls itself.
    pub async fn run<F, Fut>(&self, work: F) -> Arc<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        // Subscribe before racing for the slot so a completion landing
        // between the checks below still wakes us.
        let mut completions = self.completions.subscribe();

        if self.try_acquire() {
            return self.execute(work).await;
        }
        loop {
            if let Some(snapshot) = self.last_good() {
                return snapshot;
            }
            let _ = completions.changed().await;
            // Woken by a release: either the poll completed (slot now
            // filled) or the worker was cancelled before finishing.
            if let Some(snapshot) = self.last_good() {
                return snapshot;
            }
            if self.try_acquire() {
                return self.execute(work).await;
            }
        }
    }

    fn try_acquire(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    async fn execute<F, Fut>(&self, work: F) -> Arc<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let _release = Release { guard: self };
        let snapshot = Arc::new(work().await);
        *self.last_good.write() = Some(snapshot.clone());
        snapshot
    }
}

impl<T> Default for PollGuard<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct Release<'a, T> {
    guard: &'a PollGuard<T>,
}

impl<T> Drop for Release<'_, T> {
    fn drop(&mut self) {
        self.guard.in_flight.store(false, Ordering::Release);
        self.guard.completions.send_modify(|n| *n += 1);
    }
}
