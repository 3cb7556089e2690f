//! Instrumentation for OS handles held by filesystem-backed nodes

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts OS handles opened by a tree: how many are live now, the most that
/// were ever live at once, and how many were opened in total.
///
/// Clones share the same counters, so a tracker handed to
/// [`SerialTree::with_tracker`](super::SerialTree::with_tracker) can be
/// inspected while and after the tree is walked.
#[derive(Debug, Clone, Default)]
pub struct HandleTracker {
    counts: Arc<Counts>,
}

#[derive(Debug, Default)]
struct Counts {
    live: AtomicUsize,
    peak: AtomicUsize,
    opened: AtomicUsize,
}

impl HandleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles currently open.
    pub fn live(&self) -> usize {
        self.counts.live.load(Ordering::SeqCst)
    }

    /// Highest number of handles open at the same time.
    pub fn peak(&self) -> usize {
        self.counts.peak.load(Ordering::SeqCst)
    }

    /// Handles opened since the tracker was created.
    pub fn opened(&self) -> usize {
        self.counts.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn acquire(&self) -> HandleGuard {
        self.counts.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.counts.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counts.peak.fetch_max(live, Ordering::SeqCst);
        HandleGuard {
            counts: Arc::clone(&self.counts),
        }
    }
}

/// Marks one open handle; released on drop.
#[derive(Debug)]
pub(crate) struct HandleGuard {
    counts: Arc<Counts>,
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.counts.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_tracks_live_and_peak() {
        let tracker = HandleTracker::new();
        let a = tracker.acquire();
        let b = tracker.acquire();
        assert_eq!(tracker.live(), 2);
        drop(a);
        let c = tracker.clone().acquire();
        assert_eq!(tracker.live(), 2);
        assert_eq!(tracker.peak(), 2);
        assert_eq!(tracker.opened(), 3);
        drop(b);
        drop(c);
        assert_eq!(tracker.live(), 0);
    }
}
