//! Memory pools organized by exact word-count size classes.
//!
//! Heads are kept sorted by descending word count and located by binary
//! search. [`MemoryPoolSt`] is for single-threaded use; [`MemoryPoolMt`]
//! guards its head list with a reader-writer lock and may be shared across
//! threads.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::buffer::OwnedBuffer;
use crate::head::{MemoryPoolHead, MemoryPoolHeadMt, MemoryPoolHeadSt};
use crate::options::PoolOptions;
use crate::stats::PoolStats;

/// Bytes in one pool word.
pub const BYTES_PER_UINT64: usize = std::mem::size_of::<u64>();

/// Source of word buffers for the arithmetic routines.
pub trait MemoryPool {
    /// Shared handle to a size-class head, stored in every buffer.
    type Head: MemoryPoolHead;

    /// A buffer of exactly `uint64_count` words with unspecified content.
    ///
    /// A zero count returns an unset buffer and allocates nothing.
    fn get_for_uint64_count(&self, uint64_count: usize) -> OwnedBuffer<Self::Head>;

    /// Like [`get_for_uint64_count`](Self::get_for_uint64_count), zero filled.
    fn get_for_uint64_count_zeroed(&self, uint64_count: usize) -> OwnedBuffer<Self::Head> {
        let mut buffer = self.get_for_uint64_count(uint64_count);
        buffer.fill(0);
        buffer
    }

    /// A buffer of at least `byte_count` bytes, rounded up to whole words.
    fn get_for_byte_count(&self, byte_count: usize) -> OwnedBuffer<Self::Head> {
        self.get_for_uint64_count(byte_count.div_ceil(BYTES_PER_UINT64))
    }

    /// Number of distinct size classes.
    fn pool_count(&self) -> usize;

    /// Words allocated across every slab of every size class.
    fn alloc_uint64_count(&self) -> usize;

    /// Bytes allocated across every slab of every size class.
    fn alloc_byte_count(&self) -> usize {
        self.alloc_uint64_count() * BYTES_PER_UINT64
    }

    /// Usage counters summed over all size classes.
    fn stats(&self) -> PoolStats;

    /// Reset the usage counters of every size class.
    fn reset_stats(&self);
}

fn find_head<H: MemoryPoolHead>(heads: &[H], uint64_count: usize) -> Result<usize, usize> {
    heads.binary_search_by(|head| uint64_count.cmp(&head.uint64_count()))
}

fn total_uint64_count<H: MemoryPoolHead>(heads: &[H]) -> usize {
    heads
        .iter()
        .map(|head| head.alloc_item_count() * head.uint64_count())
        .sum()
}

fn total_stats<H: MemoryPoolHead>(heads: &[H]) -> PoolStats {
    let mut total = PoolStats::default();
    for head in heads {
        total += head.stats();
    }
    total
}

/// Pool for use from a single thread.
#[derive(Debug, Default)]
pub struct MemoryPoolSt {
    heads: RefCell<Vec<Rc<MemoryPoolHeadSt>>>,
    options: PoolOptions,
}

impl MemoryPoolSt {
    /// Create an empty pool with default growth options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(PoolOptions::default())
    }

    /// Create an empty pool with the given growth options.
    #[must_use]
    pub fn with_options(options: PoolOptions) -> Self {
        Self {
            heads: RefCell::new(Vec::new()),
            options: options.normalize(),
        }
    }
}

impl MemoryPool for MemoryPoolSt {
    type Head = Rc<MemoryPoolHeadSt>;

    fn get_for_uint64_count(&self, uint64_count: usize) -> OwnedBuffer<Self::Head> {
        if uint64_count == 0 {
            return OwnedBuffer::unset();
        }
        let head = {
            let mut heads = self.heads.borrow_mut();
            match find_head(heads.as_slice(), uint64_count) {
                Ok(index) => Rc::clone(&heads[index]),
                Err(index) => {
                    let head = Rc::new(MemoryPoolHeadSt::new(uint64_count, self.options));
                    heads.insert(index, Rc::clone(&head));
                    debug!(uint64_count, pool_count = heads.len(), "created size class");
                    head
                }
            }
        };
        OwnedBuffer::from_head(head)
    }

    fn pool_count(&self) -> usize {
        self.heads.borrow().len()
    }

    fn alloc_uint64_count(&self) -> usize {
        total_uint64_count(self.heads.borrow().as_slice())
    }

    fn stats(&self) -> PoolStats {
        total_stats(self.heads.borrow().as_slice())
    }

    fn reset_stats(&self) {
        for head in self.heads.borrow().iter() {
            head.reset_stats();
        }
    }
}

/// Pool that may be shared between threads.
#[derive(Debug, Default)]
pub struct MemoryPoolMt {
    heads: RwLock<Vec<Arc<MemoryPoolHeadMt>>>,
    options: PoolOptions,
}

impl MemoryPoolMt {
    /// Create an empty pool with default growth options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(PoolOptions::default())
    }

    /// Create an empty pool with the given growth options.
    #[must_use]
    pub fn with_options(options: PoolOptions) -> Self {
        Self {
            heads: RwLock::new(Vec::new()),
            options: options.normalize(),
        }
    }

    fn head_for(&self, uint64_count: usize) -> Arc<MemoryPoolHeadMt> {
        {
            let heads = self.heads.read();
            if let Ok(index) = find_head(heads.as_slice(), uint64_count) {
                return Arc::clone(&heads[index]);
            }
        }

        let mut heads = self.heads.write();
        // another thread may have inserted the class between the two locks
        match find_head(heads.as_slice(), uint64_count) {
            Ok(index) => Arc::clone(&heads[index]),
            Err(index) => {
                let head = Arc::new(MemoryPoolHeadMt::new(uint64_count, self.options));
                heads.insert(index, Arc::clone(&head));
                debug!(uint64_count, pool_count = heads.len(), "created size class");
                head
            }
        }
    }
}

impl MemoryPool for MemoryPoolMt {
    type Head = Arc<MemoryPoolHeadMt>;

    fn get_for_uint64_count(&self, uint64_count: usize) -> OwnedBuffer<Self::Head> {
        if uint64_count == 0 {
            return OwnedBuffer::unset();
        }
        OwnedBuffer::from_head(self.head_for(uint64_count))
    }

    fn pool_count(&self) -> usize {
        self.heads.read().len()
    }

    fn alloc_uint64_count(&self) -> usize {
        total_uint64_count(self.heads.read().as_slice())
    }

    fn stats(&self) -> PoolStats {
        total_stats(self.heads.read().as_slice())
    }

    fn reset_stats(&self) {
        for head in self.heads.read().iter() {
            head.reset_stats();
        }
    }
}
