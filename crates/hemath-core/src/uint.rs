//! Fixed-width unsigned integers stored as little-endian word slices.
//!
//! The slice length is the operand width. Routines that can be handed
//! inconsistent widths come in a checked form returning [`ArithError`] and an
//! `_unchecked` form that trusts the caller.

use std::cmp::Ordering;

use hemath_memory::{BorrowedBuffer, MemoryPool, OwnedBuffer};
use num_bigint::BigUint;

use crate::constants::BITS_PER_UINT64;
use crate::error::{ensure_len, ensure_nonempty, ArithError};
use crate::word;

/// Set every word to zero.
pub fn set_zero_uint(result: &mut [u64]) {
    result.fill(0);
}

/// Store a single-word value, zeroing the remaining words.
pub fn set_uint(value: u64, result: &mut [u64]) -> Result<(), ArithError> {
    ensure_nonempty("result", result.len())?;
    set_uint_unchecked(value, result);
    Ok(())
}

/// Unchecked form of [`set_uint`].
pub fn set_uint_unchecked(value: u64, result: &mut [u64]) {
    result[0] = value;
    set_zero_uint(&mut result[1..]);
}

/// Copy `value` into `result`, zero-extending or truncating to `result.len()`.
pub fn set_uint_uint(value: &[u64], result: &mut [u64]) {
    let copied = value.len().min(result.len());
    result[..copied].copy_from_slice(&value[..copied]);
    set_zero_uint(&mut result[copied..]);
}

/// Whether every word is zero. An empty slice is zero.
pub fn is_zero_uint(value: &[u64]) -> bool {
    value.iter().all(|&word| word == 0)
}

/// Whether `value` equals the single word `scalar`.
pub fn is_equal_uint(value: &[u64], scalar: u64) -> bool {
    match value.split_first() {
        Some((&low, high)) => low == scalar && is_zero_uint(high),
        None => scalar == 0,
    }
}

/// Whether the top bit of the top word is set.
pub fn is_high_bit_set_uint(value: &[u64]) -> bool {
    value.last().is_some_and(|&word| word >> (BITS_PER_UINT64 - 1) != 0)
}

/// Whether bit `bit_index` is set.
pub fn is_bit_set_uint(value: &[u64], bit_index: usize) -> Result<bool, ArithError> {
    ensure_bit_index(value.len(), bit_index)?;
    Ok(is_bit_set_uint_unchecked(value, bit_index))
}

/// Unchecked form of [`is_bit_set_uint`].
pub fn is_bit_set_uint_unchecked(value: &[u64], bit_index: usize) -> bool {
    value[bit_index / BITS_PER_UINT64] & (1u64 << (bit_index % BITS_PER_UINT64)) != 0
}

/// Set bit `bit_index`.
pub fn set_bit_uint(value: &mut [u64], bit_index: usize) -> Result<(), ArithError> {
    ensure_bit_index(value.len(), bit_index)?;
    set_bit_uint_unchecked(value, bit_index);
    Ok(())
}

/// Unchecked form of [`set_bit_uint`].
pub fn set_bit_uint_unchecked(value: &mut [u64], bit_index: usize) {
    value[bit_index / BITS_PER_UINT64] |= 1u64 << (bit_index % BITS_PER_UINT64);
}

fn ensure_bit_index(uint64_count: usize, bit_index: usize) -> Result<(), ArithError> {
    let width = uint64_count * BITS_PER_UINT64;
    if bit_index < width {
        Ok(())
    } else {
        Err(ArithError::BitIndexOutOfRange {
            index: bit_index,
            width,
        })
    }
}

/// Number of bits needed to represent `value`; zero for zero.
pub fn get_significant_bit_count_uint(value: &[u64]) -> usize {
    match value.iter().rposition(|&word| word != 0) {
        Some(top) => top * BITS_PER_UINT64 + word::significant_bit_count(value[top]),
        None => 0,
    }
}

/// Number of words up to and including the highest nonzero one.
pub fn get_significant_uint64_count_uint(value: &[u64]) -> usize {
    value.iter().rposition(|&word| word != 0).map_or(0, |top| top + 1)
}

/// Number of nonzero words.
pub fn get_nonzero_uint64_count_uint(value: &[u64]) -> usize {
    value.iter().filter(|&&word| word != 0).count()
}

/// `Some(k)` when `value == 2^k`.
pub fn get_power_of_two_uint(value: &[u64]) -> Option<usize> {
    let top = value.iter().rposition(|&word| word != 0)?;
    if !is_zero_uint(&value[..top]) {
        return None;
    }
    word::power_of_two(value[top]).map(|bit| top * BITS_PER_UINT64 + bit)
}

/// `Some(k)` when `value == 2^k - 1` with `k >= 1`.
pub fn get_power_of_two_minus_one_uint(value: &[u64]) -> Option<usize> {
    let top = value.iter().rposition(|&word| word != 0)?;
    if value[..top].iter().any(|&word| word != u64::MAX) {
        return None;
    }
    word::power_of_two_minus_one(value[top]).map(|bits| top * BITS_PER_UINT64 + bits)
}

/// Keep only the low `bit_count` bits.
pub fn filter_highbits_uint(value: &mut [u64], bit_count: usize) -> Result<(), ArithError> {
    let width = value.len() * BITS_PER_UINT64;
    if bit_count > width {
        return Err(ArithError::BitIndexOutOfRange {
            index: bit_count,
            width,
        });
    }
    filter_highbits_uint_unchecked(value, bit_count);
    Ok(())
}

/// Unchecked form of [`filter_highbits_uint`].
pub fn filter_highbits_uint_unchecked(value: &mut [u64], bit_count: usize) {
    let full_words = bit_count / BITS_PER_UINT64;
    let partial_bits = bit_count % BITS_PER_UINT64;
    if full_words >= value.len() {
        return;
    }
    value[full_words] &= word::low_bits_mask(partial_bits);
    set_zero_uint(&mut value[full_words + 1..]);
}

/// Compare two operands of the same width.
pub fn compare_uint_uint(a: &[u64], b: &[u64]) -> Result<Ordering, ArithError> {
    ensure_len("b", a.len(), b.len())?;
    Ok(compare_uint_uint_unchecked(a, b))
}

/// Unchecked form of [`compare_uint_uint`].
pub fn compare_uint_uint_unchecked(a: &[u64], b: &[u64]) -> Ordering {
    a.iter().rev().cmp(b.iter().rev())
}

/// Compare two operands of any widths; missing high words count as zero.
pub fn compare_uint_uint_unequal(a: &[u64], b: &[u64]) -> Ordering {
    let common = a.len().min(b.len());
    if !is_zero_uint(&a[common..]) {
        return Ordering::Greater;
    }
    if !is_zero_uint(&b[common..]) {
        return Ordering::Less;
    }
    compare_uint_uint_unchecked(&a[..common], &b[..common])
}

/// `a == b` over any widths.
pub fn is_equal_uint_uint(a: &[u64], b: &[u64]) -> bool {
    compare_uint_uint_unequal(a, b) == Ordering::Equal
}

/// `a != b` over any widths.
pub fn is_not_equal_uint_uint(a: &[u64], b: &[u64]) -> bool {
    compare_uint_uint_unequal(a, b) != Ordering::Equal
}

/// `a > b` over any widths.
pub fn is_greater_than_uint_uint(a: &[u64], b: &[u64]) -> bool {
    compare_uint_uint_unequal(a, b) == Ordering::Greater
}

/// `a >= b` over any widths.
pub fn is_greater_than_or_equal_uint_uint(a: &[u64], b: &[u64]) -> bool {
    compare_uint_uint_unequal(a, b) != Ordering::Less
}

/// `a < b` over any widths.
pub fn is_less_than_uint_uint(a: &[u64], b: &[u64]) -> bool {
    compare_uint_uint_unequal(a, b) == Ordering::Less
}

/// `a <= b` over any widths.
pub fn is_less_than_or_equal_uint_uint(a: &[u64], b: &[u64]) -> bool {
    compare_uint_uint_unequal(a, b) != Ordering::Greater
}

/// A pool buffer of `uint64_count` words with unspecified content.
pub fn allocate_uint<P: MemoryPool>(uint64_count: usize, pool: &P) -> OwnedBuffer<P::Head> {
    pool.get_for_uint64_count(uint64_count)
}

/// A zeroed pool buffer of `uint64_count` words.
pub fn allocate_zero_uint<P: MemoryPool>(uint64_count: usize, pool: &P) -> OwnedBuffer<P::Head> {
    pool.get_for_uint64_count_zeroed(uint64_count)
}

/// View `input` as `new_uint64_count` words.
///
/// Returns an alias of the caller's words when they are wide enough and
/// `force` is false; otherwise copies them, zero-extended, into pool memory.
pub fn duplicate_uint_if_needed<'a, P: MemoryPool>(
    input: &'a [u64],
    new_uint64_count: usize,
    force: bool,
    pool: &P,
) -> BorrowedBuffer<'a, P::Head> {
    if !force && input.len() >= new_uint64_count {
        return BorrowedBuffer::Alias(&input[..new_uint64_count]);
    }
    let mut copy = allocate_uint(new_uint64_count, pool);
    set_uint_uint(input, &mut copy);
    BorrowedBuffer::Owned(copy)
}

/// Write `value` into `uint64_count` words.
pub fn uint_from_biguint(value: &BigUint, uint64_count: usize) -> Result<Vec<u64>, ArithError> {
    let digits = value.to_u64_digits();
    if digits.len() > uint64_count {
        return Err(ArithError::InvalidArgument(format!(
            "value needs {} words but only {uint64_count} are available",
            digits.len()
        )));
    }
    let mut result = vec![0u64; uint64_count];
    set_uint_uint(&digits, &mut result);
    Ok(result)
}

/// Read words as an arbitrary-precision integer.
pub fn uint_to_biguint(value: &[u64]) -> BigUint {
    let mut bytes = Vec::with_capacity(value.len() * 8);
    for word in value {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

#[cfg(test)]
mod tests {
    use hemath_memory::MemoryPoolSt;

    use super::*;

    // --- setters and predicates ---

    #[test]
    fn set_and_zero() {
        let mut value = [7u64, 8, 9];
        set_uint(5, &mut value).unwrap();
        assert_eq!(value, [5, 0, 0]);
        set_zero_uint(&mut value);
        assert!(is_zero_uint(&value));
        assert!(set_uint(1, &mut []).is_err());
    }

    #[test]
    fn set_uint_uint_extends_and_truncates() {
        let mut wide = [u64::MAX; 4];
        set_uint_uint(&[1, 2], &mut wide);
        assert_eq!(wide, [1, 2, 0, 0]);
        let mut narrow = [0u64; 1];
        set_uint_uint(&[3, 4], &mut narrow);
        assert_eq!(narrow, [3]);
    }

    #[test]
    fn equality_with_scalar() {
        assert!(is_equal_uint(&[1, 0], 1));
        assert!(!is_equal_uint(&[1, 1], 1));
        assert!(is_equal_uint(&[], 0));
        assert!(!is_equal_uint(&[], 3));
    }

    #[test]
    fn high_bit() {
        assert!(is_high_bit_set_uint(&[0, 1 << 63]));
        assert!(!is_high_bit_set_uint(&[u64::MAX, 1]));
        assert!(!is_high_bit_set_uint(&[]));
    }

    #[test]
    fn bit_access() {
        let mut value = [0u64; 2];
        set_bit_uint(&mut value, 70).unwrap();
        assert_eq!(value, [0, 1 << 6]);
        assert!(is_bit_set_uint(&value, 70).unwrap());
        assert!(!is_bit_set_uint(&value, 6).unwrap());
        assert_eq!(
            set_bit_uint(&mut value, 128),
            Err(ArithError::BitIndexOutOfRange {
                index: 128,
                width: 128
            })
        );
    }

    // --- counting ---

    #[test]
    fn significant_counts() {
        assert_eq!(get_significant_bit_count_uint(&[0, 0]), 0);
        assert_eq!(get_significant_bit_count_uint(&[1, 0]), 1);
        assert_eq!(get_significant_bit_count_uint(&[0, 1]), 65);
        assert_eq!(get_significant_uint64_count_uint(&[5, 0, 0]), 1);
        assert_eq!(get_significant_uint64_count_uint(&[0, 0, 9]), 3);
        assert_eq!(get_nonzero_uint64_count_uint(&[5, 0, 9]), 2);
    }

    #[test]
    fn powers_of_two() {
        assert_eq!(get_power_of_two_uint(&[0, 0]), None);
        assert_eq!(get_power_of_two_uint(&[0, 4]), Some(66));
        assert_eq!(get_power_of_two_uint(&[1, 4]), None);
        assert_eq!(get_power_of_two_minus_one_uint(&[31, 0]), Some(5));
        assert_eq!(get_power_of_two_minus_one_uint(&[u64::MAX, 3]), Some(66));
        assert_eq!(get_power_of_two_minus_one_uint(&[u64::MAX - 1, 3]), None);
        assert_eq!(get_power_of_two_minus_one_uint(&[0, 0]), None);
    }

    #[test]
    fn filter_highbits() {
        let mut value = [u64::MAX; 3];
        filter_highbits_uint(&mut value, 70).unwrap();
        assert_eq!(value, [u64::MAX, 63, 0]);
        let mut value = [u64::MAX; 2];
        filter_highbits_uint(&mut value, 128).unwrap();
        assert_eq!(value, [u64::MAX; 2]);
        filter_highbits_uint(&mut value, 64).unwrap();
        assert_eq!(value, [u64::MAX, 0]);
        assert!(filter_highbits_uint(&mut value, 129).is_err());
    }

    // --- comparison ---

    #[test]
    fn compare_equal_widths() {
        assert_eq!(compare_uint_uint(&[5], &[5]).unwrap(), Ordering::Equal);
        assert_eq!(compare_uint_uint(&[3], &[5]).unwrap(), Ordering::Less);
        assert_eq!(compare_uint_uint(&[0, 1], &[u64::MAX, 0]).unwrap(), Ordering::Greater);
        assert!(compare_uint_uint(&[1], &[1, 0]).is_err());
    }

    #[test]
    fn compare_unequal_widths() {
        assert_eq!(compare_uint_uint_unequal(&[5, 0, 0], &[5]), Ordering::Equal);
        assert_eq!(compare_uint_uint_unequal(&[5, 0, 1], &[9]), Ordering::Greater);
        assert_eq!(compare_uint_uint_unequal(&[9], &[5, 1]), Ordering::Less);
        assert!(is_greater_than_or_equal_uint_uint(&[5], &[5, 0]));
        assert!(is_less_than_uint_uint(&[4], &[5, 0]));
        assert!(is_less_than_or_equal_uint_uint(&[], &[0]));
        assert!(is_not_equal_uint_uint(&[1], &[0, 1]));
        assert!(is_greater_than_uint_uint(&[0, 1], &[u64::MAX]));
        assert!(is_equal_uint_uint(&[], &[0, 0]));
    }

    // --- pool helpers ---

    #[test]
    fn allocate_zero_clears_reused_words() {
        let pool = MemoryPoolSt::new();
        let mut buffer = allocate_uint(2, &pool);
        buffer.fill(3);
        drop(buffer);
        let buffer = allocate_zero_uint(2, &pool);
        assert!(is_zero_uint(&buffer));
    }

    #[test]
    fn duplicate_aliases_wide_input() {
        let pool = MemoryPoolSt::new();
        let input = [1u64, 2, 3];
        let view = duplicate_uint_if_needed(&input, 2, false, &pool);
        assert!(view.is_alias());
        assert_eq!(&*view, &[1, 2]);
        assert_eq!(pool.pool_count(), 0);
    }

    #[test]
    fn duplicate_copies_when_forced_or_narrow() {
        let pool = MemoryPoolSt::new();
        let input = [1u64, 2];
        let forced = duplicate_uint_if_needed(&input, 2, true, &pool);
        assert!(!forced.is_alias());
        assert_eq!(&*forced, &[1, 2]);
        assert_ne!(forced.as_ptr(), input.as_ptr());
        let widened = duplicate_uint_if_needed(&input, 4, false, &pool);
        assert_eq!(&*widened, &[1, 2, 0, 0]);
    }

    // --- conversions ---

    #[test]
    fn biguint_conversions() {
        let value = (BigUint::from(1u32) << 70u32) + 5u32;
        let words = uint_from_biguint(&value, 3).unwrap();
        assert_eq!(words, vec![5, 64, 0]);
        assert_eq!(uint_to_biguint(&words), value);
        assert!(uint_from_biguint(&value, 1).is_err());
        assert_eq!(uint_to_biguint(&[]), BigUint::from(0u32));
    }
}
