//! Pool growth options.

/// Items in the first slab of a new size class.
pub const DEFAULT_FIRST_ALLOC_COUNT: usize = 1;

/// Growth factor applied to the previous slab size.
pub const DEFAULT_ALLOC_SIZE_MULTIPLIER: f64 = 1.05;

/// Slab growth policy shared by every head of a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolOptions {
    /// Number of items allocated when a size class is first requested.
    pub first_alloc_count: usize,
    /// Each new slab holds `ceil(alloc_size_multiplier * previous)` items.
    pub alloc_size_multiplier: f64,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            first_alloc_count: DEFAULT_FIRST_ALLOC_COUNT,
            alloc_size_multiplier: DEFAULT_ALLOC_SIZE_MULTIPLIER,
        }
    }
}

impl PoolOptions {
    /// Normalize options, replacing values that would stall growth.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.first_alloc_count == 0 {
            self.first_alloc_count = DEFAULT_FIRST_ALLOC_COUNT;
        }
        if !self.alloc_size_multiplier.is_finite() || self.alloc_size_multiplier < 1.0 {
            self.alloc_size_multiplier = DEFAULT_ALLOC_SIZE_MULTIPLIER;
        }
        self
    }

    /// Size of the slab that follows one of `last_size` items.
    ///
    /// Always strictly larger than `last_size`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn next_slab_size(&self, last_size: usize) -> usize {
        let grown = (self.alloc_size_multiplier * last_size as f64).ceil() as usize;
        grown.max(last_size.saturating_add(1))
    }
}
