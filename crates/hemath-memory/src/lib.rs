//! # hemath-memory
//!
//! Memory pools for the `hemath` arithmetic core.
//!
//! A pool hands out fixed-length word buffers drawn from size-class heads
//! that grow by slabs and recycle released items in LIFO order. Buffers are
//! RAII handles: dropping one returns its item to the head it came from.
#![warn(missing_docs)]

pub mod buffer;
pub mod head;
pub mod options;
pub mod pool;
pub mod stats;

pub use buffer::{BorrowedBuffer, OwnedBuffer};
pub use head::{MemoryPoolHead, MemoryPoolHeadMt, MemoryPoolHeadSt};
pub use options::PoolOptions;
pub use pool::{MemoryPool, MemoryPoolMt, MemoryPoolSt, BYTES_PER_UINT64};
pub use stats::PoolStats;
