//! Size-class heads.
//!
//! A head owns every item of one word count. Items are handed out from a
//! LIFO free stack first, then from a reserve of never-used items; when both
//! are empty the head grows a slab whose size follows
//! [`PoolOptions::next_slab_size`].
//!
//! A slab is a batch of separately boxed items allocated together, not one
//! contiguous block; its size only drives how many items each growth adds.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::trace;

use crate::options::PoolOptions;
use crate::stats::{AtomicPoolStats, LocalPoolStats, PoolStats, RecordStats};

/// Operations a pool buffer needs from the head it was drawn from.
pub trait MemoryPoolHead {
    /// Word count of every item in this head.
    fn uint64_count(&self) -> usize;

    /// Total items allocated across all slabs.
    fn alloc_item_count(&self) -> usize;

    /// Pop an item, growing a slab if nothing is available.
    fn get(&self) -> Box<[u64]>;

    /// Push an item back on top of the free stack.
    fn add(&self, item: Box<[u64]>);

    /// Usage counters of this head.
    fn stats(&self) -> PoolStats;

    /// Reset the usage counters of this head.
    fn reset_stats(&self);
}

#[derive(Debug, Default)]
struct HeadState {
    free: Vec<Box<[u64]>>,
    reserve: Vec<Box<[u64]>>,
    last_slab_size: usize,
    alloc_item_count: usize,
}

impl HeadState {
    fn get<S: RecordStats>(
        &mut self,
        uint64_count: usize,
        options: &PoolOptions,
        stats: &S,
    ) -> Box<[u64]> {
        if let Some(item) = self.free.pop() {
            stats.record_hit();
            return item;
        }
        stats.record_miss();
        match self.reserve.pop() {
            Some(item) => item,
            None => self.grow(uint64_count, options, stats),
        }
    }

    fn add<S: RecordStats>(&mut self, item: Box<[u64]>, stats: &S) {
        stats.record_release();
        self.free.push(item);
    }

    /// Allocate the next slab, keep all but one item in reserve and return that one.
    fn grow<S: RecordStats>(
        &mut self,
        uint64_count: usize,
        options: &PoolOptions,
        stats: &S,
    ) -> Box<[u64]> {
        let slab_size = if self.last_slab_size == 0 {
            options.first_alloc_count.max(1)
        } else {
            options.next_slab_size(self.last_slab_size)
        };
        self.reserve.reserve(slab_size - 1);
        self.reserve.extend((1..slab_size).map(|_| new_item(uint64_count)));
        self.last_slab_size = slab_size;
        self.alloc_item_count += slab_size;
        stats.record_slab_growth();
        trace!(
            uint64_count,
            slab_size,
            alloc_item_count = self.alloc_item_count,
            "memory pool head grew a slab"
        );
        new_item(uint64_count)
    }
}

fn new_item(uint64_count: usize) -> Box<[u64]> {
    vec![0u64; uint64_count].into_boxed_slice()
}

/// Head of a single-threaded pool.
#[derive(Debug)]
pub struct MemoryPoolHeadSt {
    uint64_count: usize,
    options: PoolOptions,
    state: RefCell<HeadState>,
    stats: LocalPoolStats,
}

impl MemoryPoolHeadSt {
    /// Create an empty head for items of `uint64_count` words.
    #[must_use]
    pub fn new(uint64_count: usize, options: PoolOptions) -> Self {
        Self {
            uint64_count,
            options,
            state: RefCell::new(HeadState::default()),
            stats: LocalPoolStats::new(),
        }
    }
}

impl MemoryPoolHead for MemoryPoolHeadSt {
    fn uint64_count(&self) -> usize {
        self.uint64_count
    }

    fn alloc_item_count(&self) -> usize {
        self.state.borrow().alloc_item_count
    }

    fn get(&self) -> Box<[u64]> {
        self.state
            .borrow_mut()
            .get(self.uint64_count, &self.options, &self.stats)
    }

    fn add(&self, item: Box<[u64]>) {
        self.state.borrow_mut().add(item, &self.stats);
    }

    fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    fn reset_stats(&self) {
        self.stats.reset();
    }
}

/// Head of a thread-safe pool; its free stack sits behind a spin lock.
#[derive(Debug)]
pub struct MemoryPoolHeadMt {
    uint64_count: usize,
    options: PoolOptions,
    state: spin::Mutex<HeadState>,
    stats: AtomicPoolStats,
}

impl MemoryPoolHeadMt {
    /// Create an empty head for items of `uint64_count` words.
    #[must_use]
    pub fn new(uint64_count: usize, options: PoolOptions) -> Self {
        Self {
            uint64_count,
            options,
            state: spin::Mutex::new(HeadState::default()),
            stats: AtomicPoolStats::new(),
        }
    }
}

impl MemoryPoolHead for MemoryPoolHeadMt {
    fn uint64_count(&self) -> usize {
        self.uint64_count
    }

    fn alloc_item_count(&self) -> usize {
        self.state.lock().alloc_item_count
    }

    fn get(&self) -> Box<[u64]> {
        self.state
            .lock()
            .get(self.uint64_count, &self.options, &self.stats)
    }

    fn add(&self, item: Box<[u64]>) {
        self.state.lock().add(item, &self.stats);
    }

    fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    fn reset_stats(&self) {
        self.stats.reset();
    }
}

impl<T: MemoryPoolHead + ?Sized> MemoryPoolHead for Rc<T> {
    fn uint64_count(&self) -> usize {
        (**self).uint64_count()
    }

    fn alloc_item_count(&self) -> usize {
        (**self).alloc_item_count()
    }

    fn get(&self) -> Box<[u64]> {
        (**self).get()
    }

    fn add(&self, item: Box<[u64]>) {
        (**self).add(item);
    }

    fn stats(&self) -> PoolStats {
        (**self).stats()
    }

    fn reset_stats(&self) {
        (**self).reset_stats();
    }
}

impl<T: MemoryPoolHead + ?Sized> MemoryPoolHead for Arc<T> {
    fn uint64_count(&self) -> usize {
        (**self).uint64_count()
    }

    fn alloc_item_count(&self) -> usize {
        (**self).alloc_item_count()
    }

    fn get(&self) -> Box<[u64]> {
        (**self).get()
    }

    fn add(&self, item: Box<[u64]>) {
        (**self).add(item);
    }

    fn stats(&self) -> PoolStats {
        (**self).stats()
    }

    fn reset_stats(&self) {
        (**self).reset_stats();
    }
}
