//! Bit-serial long division.
//!
//! The denominator is aligned with the numerator's top bit and subtracted
//! once per quotient bit. After each subtraction the remainder is shifted
//! left until its top bit lines up with the denominator again, so the
//! denominator itself never moves after the initial alignment. The
//! remainder is shifted back into place at the end.

use hemath_memory::MemoryPool;

use crate::arith::{
    add_uint_uint_inplace, left_shift_uint_inplace_unchecked, left_shift_uint_unchecked,
    right_shift_uint_inplace_unchecked, sub_uint_uint_unchecked,
};
use crate::constants::BITS_PER_UINT64;
use crate::error::{ensure_len, ArithError};
use crate::uint::{
    allocate_uint, get_significant_bit_count_uint, is_zero_uint, set_uint_uint, set_zero_uint,
};

/// Divide in place: `numerator` becomes the remainder.
///
/// `numerator`, `denominator` and `quotient` must share one width and the
/// denominator must be nonzero.
pub fn divide_uint_uint_inplace<P: MemoryPool>(
    numerator: &mut [u64],
    denominator: &[u64],
    quotient: &mut [u64],
    pool: &P,
) -> Result<(), ArithError> {
    ensure_len("denominator", numerator.len(), denominator.len())?;
    ensure_len("quotient", numerator.len(), quotient.len())?;
    if is_zero_uint(denominator) {
        return Err(ArithError::ZeroDivisor);
    }
    divide_uint_uint_inplace_unchecked(numerator, denominator, quotient, pool);
    Ok(())
}

/// Unchecked form of [`divide_uint_uint_inplace`].
pub fn divide_uint_uint_inplace_unchecked<P: MemoryPool>(
    numerator: &mut [u64],
    denominator: &[u64],
    quotient: &mut [u64],
    pool: &P,
) {
    long_divide(numerator, denominator, Some(quotient), pool);
}

/// `quotient = numerator / denominator`, `remainder = numerator % denominator`.
pub fn divide_uint_uint<P: MemoryPool>(
    numerator: &[u64],
    denominator: &[u64],
    quotient: &mut [u64],
    remainder: &mut [u64],
    pool: &P,
) -> Result<(), ArithError> {
    ensure_len("remainder", numerator.len(), remainder.len())?;
    remainder.copy_from_slice(numerator);
    divide_uint_uint_inplace(remainder, denominator, quotient, pool)
}

/// Unchecked form of [`divide_uint_uint`].
pub fn divide_uint_uint_unchecked<P: MemoryPool>(
    numerator: &[u64],
    denominator: &[u64],
    quotient: &mut [u64],
    remainder: &mut [u64],
    pool: &P,
) {
    remainder.copy_from_slice(numerator);
    long_divide(remainder, denominator, Some(quotient), pool);
}

/// Reduce `numerator` modulo `denominator` in place, optionally recording the
/// quotient. The denominator may be wider than the numerator as long as its
/// extra words are zero. A zero denominator leaves the numerator untouched
/// and the quotient zero.
pub(crate) fn long_divide<P: MemoryPool>(
    numerator: &mut [u64],
    denominator: &[u64],
    mut quotient: Option<&mut [u64]>,
    pool: &P,
) {
    if let Some(q) = quotient.as_deref_mut() {
        set_zero_uint(q);
    }

    let mut numerator_bits = get_significant_bit_count_uint(numerator);
    let mut denominator_bits = get_significant_bit_count_uint(denominator);
    if denominator_bits == 0 || numerator_bits < denominator_bits {
        return;
    }

    let uint64_count = numerator_bits.div_ceil(BITS_PER_UINT64);
    let numerator = &mut numerator[..uint64_count];
    if uint64_count == 1 {
        let d = denominator[0];
        if let Some(q) = quotient.as_deref_mut() {
            q[0] = numerator[0] / d;
        }
        numerator[0] %= d;
        return;
    }

    let mut shifted_denominator = allocate_uint(uint64_count, pool);
    set_uint_uint(denominator, &mut shifted_denominator);
    let mut difference = allocate_uint(uint64_count, pool);

    let denominator_shift = numerator_bits - denominator_bits;
    left_shift_uint_inplace_unchecked(&mut shifted_denominator, denominator_shift);
    denominator_bits += denominator_shift;

    let mut remaining_shifts = denominator_shift;
    while numerator_bits == denominator_bits {
        if sub_uint_uint_unchecked(numerator, &shifted_denominator, &mut difference) {
            if remaining_shifts == 0 {
                break;
            }
            // 2 * numerator - denominator, i.e. the subtraction one bit lower
            add_uint_uint_inplace(&mut difference, numerator);
            if let Some(q) = quotient.as_deref_mut() {
                left_shift_uint_inplace_unchecked(q, 1);
            }
            remaining_shifts -= 1;
        }
        if let Some(q) = quotient.as_deref_mut() {
            q[0] |= 1;
        }

        numerator_bits = get_significant_bit_count_uint(&difference);
        let numerator_shift = (denominator_bits - numerator_bits).min(remaining_shifts);
        if numerator_bits > 0 {
            left_shift_uint_unchecked(&difference, numerator_shift, numerator);
            numerator_bits += numerator_shift;
        } else {
            set_zero_uint(numerator);
        }
        if let Some(q) = quotient.as_deref_mut() {
            left_shift_uint_inplace_unchecked(q, numerator_shift);
        }
        remaining_shifts -= numerator_shift;
    }

    if numerator_bits > 0 {
        right_shift_uint_inplace_unchecked(numerator, denominator_shift);
    }
}

#[cfg(test)]
mod tests {
    use hemath_memory::MemoryPoolSt;
    use num_bigint::BigUint;

    use super::*;
    use crate::uint::{uint_from_biguint, uint_to_biguint};

    fn check(numerator: &[u64], denominator: &[u64]) {
        let pool = MemoryPoolSt::new();
        let mut remainder = numerator.to_vec();
        let mut quotient = vec![0u64; numerator.len()];
        divide_uint_uint_inplace(&mut remainder, denominator, &mut quotient, &pool).unwrap();

        let n = uint_to_biguint(numerator);
        let d = uint_to_biguint(denominator);
        assert_eq!(uint_to_biguint(&quotient), &n / &d, "quotient of {n} / {d}");
        assert_eq!(uint_to_biguint(&remainder), &n % &d, "remainder of {n} / {d}");
    }

    #[test]
    fn single_word_division() {
        check(&[100], &[7]);
        check(&[u64::MAX], &[1]);
        check(&[3], &[5]);
    }

    #[test]
    fn numerator_below_denominator() {
        check(&[5, 0], &[0, 1]);
        check(&[0, 0], &[3, 0]);
    }

    #[test]
    fn multiword_division() {
        check(&[0, 1], &[3, 0]);
        check(&[u64::MAX, u64::MAX], &[u64::MAX, 0]);
        check(&[u64::MAX, u64::MAX], &[1, 1]);
        check(&[0x1234_5678, 0x9ABC_DEF0, 0x1111], &[0xFFFF_FFFF, 0x2, 0]);
        check(&[0, 0, 1], &[0, 1 << 63, 0]);
    }

    #[test]
    fn exact_division_clears_remainder() {
        let n = BigUint::from(0xDEAD_BEEF_u64) * (BigUint::from(1u32) << 100u32);
        let numerator = uint_from_biguint(&n, 3).unwrap();
        check(&numerator, &[0xDEAD_BEEF, 0, 0]);
        check(&numerator, &[0, 0, 1 << 36]);
    }

    #[test]
    fn divide_into_separate_remainder() {
        let pool = MemoryPoolSt::new();
        let mut quotient = [0u64; 2];
        let mut remainder = [0u64; 2];
        divide_uint_uint(&[100, 0], &[7, 0], &mut quotient, &mut remainder, &pool).unwrap();
        assert_eq!(quotient, [14, 0]);
        assert_eq!(remainder, [2, 0]);
    }

    #[test]
    fn zero_denominator_rejected() {
        let pool = MemoryPoolSt::new();
        let mut numerator = [5u64, 0];
        let mut quotient = [0u64; 2];
        assert_eq!(
            divide_uint_uint_inplace(&mut numerator, &[0, 0], &mut quotient, &pool),
            Err(ArithError::ZeroDivisor)
        );
    }

    #[test]
    fn unchecked_zero_denominator_returns() {
        let pool = MemoryPoolSt::new();
        let mut numerator = [0u64, 0];
        let mut quotient = [3u64, 3];
        divide_uint_uint_inplace_unchecked(&mut numerator, &[0, 0], &mut quotient, &pool);
        assert_eq!((numerator, quotient), ([0, 0], [0, 0]));

        let mut numerator = [9u64, 1];
        divide_uint_uint_inplace_unchecked(&mut numerator, &[0, 0], &mut quotient, &pool);
        assert_eq!((numerator, quotient), ([9, 1], [0, 0]));
    }

    #[test]
    fn mismatched_widths_rejected() {
        let pool = MemoryPoolSt::new();
        let mut numerator = [5u64, 0];
        let mut quotient = [0u64; 1];
        assert!(matches!(
            divide_uint_uint_inplace(&mut numerator, &[1, 0], &mut quotient, &pool),
            Err(ArithError::LengthMismatch { name: "quotient", .. })
        ));
    }

    #[test]
    fn remainder_only_division() {
        let pool = MemoryPoolSt::new();
        let mut value = [7u64, 3, 0];
        long_divide(&mut value, &[0, 2], None, &pool);
        assert_eq!(value, [7, 1, 0]);
    }
}
