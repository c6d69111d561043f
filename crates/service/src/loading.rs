use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const IDLE: u64 = 0;
const INITIAL: u64 = 1;

/// Shared "request in progress" flag for UI state.
///
/// Every [`begin`](LoadingFlag::begin) takes a newer ticket. Only the guard
/// holding the newest ticket lowers the flag, so a superseded request that
/// finishes first leaves the flag up for the one still running.
#[derive(Debug, Clone)]
pub struct LoadingFlag(Arc<Tickets>);

#[derive(Debug)]
struct Tickets {
    next: AtomicU64,
    active: AtomicU64,
}

impl Default for LoadingFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

impl LoadingFlag {
    pub fn new(initial: bool) -> Self {
        let active = if initial { INITIAL } else { IDLE };
        Self(Arc::new(Tickets { next: AtomicU64::new(INITIAL + 1), active: AtomicU64::new(active) }))
    }

    pub fn is_loading(&self) -> bool {
        self.0.active.load(Ordering::Acquire) != IDLE
    }

    /// Raise the flag; it drops back when the newest guard goes out of
    /// scope, whichever way the operation exits.
    pub fn begin(&self) -> LoadingGuard {
        let ticket = self.0.next.fetch_add(1, Ordering::AcqRel);
        self.0.active.fetch_max(ticket, Ordering::AcqRel);
        LoadingGuard { tickets: self.0.clone(), ticket }
    }
}

#[must_use = "the flag is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    tickets: Arc<Tickets>,
    ticket: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let _ = self
            .tickets
            .active
            .compare_exchange(self.ticket, IDLE, Ordering::AcqRel, Ordering::Acquire);
    }
}
