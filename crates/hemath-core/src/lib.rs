//! # hemath-core
//!
//! Fixed-width multiprecision arithmetic for homomorphic encryption.
//! Operands are little-endian `u64` word slices whose width the caller
//! fixes; scratch space comes from a [`hemath_memory::MemoryPool`].
//!
//! Layers, bottom up: word primitives ([`uint`], [`arith`]), multiplication,
//! generic long division, [`Modulus`] with its reduction fast paths,
//! modular arithmetic and number theory (inverses, primitive roots).

#![warn(missing_docs)]

pub mod arith;
pub mod constants;
pub mod divide;
pub mod error;
pub mod modarith;
pub mod modulus;
pub mod multiply;
pub mod numth;
pub mod options;
pub mod reduce;
pub mod uint;
pub mod word;

// Re-exports
pub use constants::{exit_codes, BITS_PER_UINT64, BYTES_PER_UINT64, PRIMITIVE_ROOT_ATTEMPTS};
pub use error::ArithError;
pub use modulus::{Modulus, ModulusError};
pub use numth::{
    is_primitive_root, try_invert_uint_mod, try_minimal_primitive_root, try_primitive_root,
};
pub use options::SearchOptions;

use hemath_memory::MemoryPoolSt;

/// Invert a single word modulo `modulus`.
///
/// This is a convenience wrapper over [`try_invert_uint_mod`] with a
/// throwaway pool.
///
/// # Example
/// ```
/// assert_eq!(hemath_core::invert_u64(3, 7), Ok(Some(5)));
/// assert_eq!(hemath_core::invert_u64(2, 4), Ok(None));
/// ```
pub fn invert_u64(operand: u64, modulus: u64) -> Result<Option<u64>, ArithError> {
    let pool = MemoryPoolSt::new();
    let inverse = try_invert_uint_mod(&[operand], &[modulus], &pool)?;
    Ok(inverse.map(|words| words[0]))
}
