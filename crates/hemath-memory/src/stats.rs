//! Pool usage counters.
//!
//! Heads record through [`RecordStats`]: thread-safe heads use
//! [`AtomicPoolStats`], single-threaded heads use the plain [`LocalPoolStats`].

use std::cell::Cell;
use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Statistics for pool usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Items served from a head's free stack.
    pub hits: u64,
    /// Items served from fresh slab capacity.
    pub misses: u64,
    /// Slabs allocated, including each size class's first slab.
    pub slab_growths: u64,
    /// Items returned to a free stack.
    pub releases: u64,
}

impl AddAssign for PoolStats {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.misses += rhs.misses;
        self.slab_growths += rhs.slab_growths;
        self.releases += rhs.releases;
    }
}

/// Counter sink a head records its events into.
pub trait RecordStats {
    /// An item was served from the free stack.
    fn record_hit(&self);
    /// An item was served from fresh capacity.
    fn record_miss(&self);
    /// A slab was allocated.
    fn record_slab_growth(&self);
    /// An item was returned.
    fn record_release(&self);
    /// Current counter values.
    fn snapshot(&self) -> PoolStats;
    /// Zero every counter.
    fn reset(&self);
}

/// Counters for a head that never leaves its thread.
#[derive(Debug, Default)]
pub struct LocalPoolStats {
    counts: Cell<PoolStats>,
}

impl LocalPoolStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, f: impl FnOnce(&mut PoolStats)) {
        let mut counts = self.counts.get();
        f(&mut counts);
        self.counts.set(counts);
    }
}

impl RecordStats for LocalPoolStats {
    fn record_hit(&self) {
        self.update(|c| c.hits += 1);
    }

    fn record_miss(&self) {
        self.update(|c| c.misses += 1);
    }

    fn record_slab_growth(&self) {
        self.update(|c| c.slab_growths += 1);
    }

    fn record_release(&self) {
        self.update(|c| c.releases += 1);
    }

    fn snapshot(&self) -> PoolStats {
        self.counts.get()
    }

    fn reset(&self) {
        self.counts.set(PoolStats::default());
    }
}

/// Atomic pool statistics for lock-free updates.
#[derive(Debug)]
pub struct AtomicPoolStats {
    hits: AtomicU64,
    misses: AtomicU64,
    slab_growths: AtomicU64,
    releases: AtomicU64,
}

impl AtomicPoolStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            slab_growths: AtomicU64::new(0),
            releases: AtomicU64::new(0),
        }
    }
}

impl RecordStats for AtomicPoolStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_slab_growth(&self) {
        self.slab_growths.fetch_add(1, Ordering::Relaxed);
    }

    fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            slab_growths: self.slab_growths.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.slab_growths.store(0, Ordering::Relaxed);
        self.releases.store(0, Ordering::Relaxed);
    }
}

impl Default for AtomicPoolStats {
    fn default() -> Self {
        Self::new()
    }
}
