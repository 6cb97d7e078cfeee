//! Word sizes, fast-path thresholds and exit codes.

/// Bits in one word.
pub const BITS_PER_UINT64: usize = 64;

/// Bytes in one word.
pub const BYTES_PER_UINT64: usize = 8;

/// Minimum number of bits by which the negated inverse of a modulus must be
/// shorter than the modulus for the multiply-and-fold reduction to apply.
pub const FAST_MOD_THRESHOLD: usize = 5;

/// Widest single-word modulus (exclusive, in bits) that carries a Barrett ratio.
pub const BARRETT_MAX_BIT_COUNT: usize = 62;

/// Random candidates tried by the primitive-root search.
pub const PRIMITIVE_ROOT_ATTEMPTS: usize = 100;

/// Exit codes for the command-line front end.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// The operation has no answer (no inverse, no primitive root).
    pub const ERROR_DOMAIN: i32 = 2;
    /// Invalid configuration or arguments.
    pub const ERROR_CONFIG: i32 = 4;
}
