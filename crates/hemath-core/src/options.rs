//! Search options for the number-theory routines.

use crate::constants::PRIMITIVE_ROOT_ATTEMPTS;

/// Options for primitive-root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Random candidates drawn before giving up.
    pub max_attempts: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_attempts: PRIMITIVE_ROOT_ATTEMPTS,
        }
    }
}

impl SearchOptions {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.max_attempts == 0 {
            self.max_attempts = PRIMITIVE_ROOT_ATTEMPTS;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        assert_eq!(SearchOptions::default().max_attempts, 100);
    }

    #[test]
    fn normalize_zero_attempts() {
        let opts = SearchOptions { max_attempts: 0 }.normalize();
        assert_eq!(opts.max_attempts, PRIMITIVE_ROOT_ATTEMPTS);
    }

    #[test]
    fn normalize_keeps_explicit_attempts() {
        let opts = SearchOptions { max_attempts: 7 }.normalize();
        assert_eq!(opts.max_attempts, 7);
    }
}
