//! Property tests for pool accounting.

use std::collections::HashSet;

use hemath_memory::{MemoryPool, MemoryPoolMt, MemoryPoolSt};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn outstanding_buffers_never_share_items(
        ops in prop::collection::vec((1usize..6, any::<bool>()), 1..80)
    ) {
        let pool = MemoryPoolSt::new();
        let mut held = Vec::new();
        let mut gets = 0u64;
        for (count, keep) in ops {
            let buffer = pool.get_for_uint64_count(count);
            gets += 1;
            prop_assert_eq!(buffer.len(), count);
            if keep {
                held.push(buffer);
            }
        }

        let distinct: HashSet<_> = held.iter().map(|buffer| buffer.as_ptr()).collect();
        prop_assert_eq!(distinct.len(), held.len());

        let outstanding: usize = held.iter().map(|buffer| buffer.len()).sum();
        prop_assert!(pool.alloc_uint64_count() >= outstanding);

        let stats = pool.stats();
        prop_assert_eq!(stats.hits + stats.misses, gets);
        prop_assert_eq!(stats.releases, gets - held.len() as u64);
    }

    #[test]
    fn pool_count_matches_distinct_sizes(counts in prop::collection::vec(0usize..40, 0..60)) {
        let pool = MemoryPoolMt::new();
        for &count in &counts {
            let _ = pool.get_for_uint64_count(count);
        }
        let distinct: HashSet<_> = counts.iter().copied().filter(|&c| c > 0).collect();
        prop_assert_eq!(pool.pool_count(), distinct.len());
    }

    #[test]
    fn byte_requests_cover_the_bytes(bytes in 1usize..4096) {
        let pool = MemoryPoolSt::new();
        let buffer = pool.get_for_byte_count(bytes);
        prop_assert!(buffer.len() * 8 >= bytes);
        prop_assert!(buffer.len() * 8 < bytes + 8);
    }
}
