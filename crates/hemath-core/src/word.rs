//! Single-word primitives with explicit carries.

/// `a + b + carry` as `(sum, carry_out)`.
///
/// `carry` is 0 or 1; `carry_out` is then 0 or 1 as well.
#[inline]
#[must_use]
pub fn add_with_carry(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let (sum, over1) = a.overflowing_add(b);
    let (sum, over2) = sum.overflowing_add(carry);
    (sum, u64::from(over1 | over2))
}

/// `a - b - borrow` as `(difference, borrow_out)`, wrapping below zero.
///
/// `borrow` is 0 or 1, and so is `borrow_out`.
#[inline]
#[must_use]
pub fn sub_with_borrow(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let (diff, under1) = a.overflowing_sub(b);
    let (diff, under2) = diff.overflowing_sub(borrow);
    (diff, u64::from(under1 | under2))
}

/// Full 128-bit product of two words, low word first: `(low, high)`.
///
/// `a * b + c + d` fits in 128 bits for any words `c` and `d`, so callers may
/// fold two carries into `high` without overflow.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn mul_wide(a: u64, b: u64) -> (u64, u64) {
    let product = u128::from(a) * u128::from(b);
    (product as u64, (product >> 64) as u64)
}

/// Number of bits needed to represent `value`; zero for zero.
#[inline]
#[must_use]
pub fn significant_bit_count(value: u64) -> usize {
    (u64::BITS - value.leading_zeros()) as usize
}

/// `Some(k)` when `value == 2^k`.
#[inline]
#[must_use]
pub fn power_of_two(value: u64) -> Option<usize> {
    value
        .is_power_of_two()
        .then(|| value.trailing_zeros() as usize)
}

/// `Some(k)` when `value == 2^k - 1` with `k >= 1`.
#[inline]
#[must_use]
pub fn power_of_two_minus_one(value: u64) -> Option<usize> {
    if value == 0 {
        return None;
    }
    (value & value.wrapping_add(1) == 0).then(|| value.trailing_ones() as usize)
}

/// Mask keeping the low `bit_count` bits of a word; `bit_count` must be below 64.
#[inline]
#[must_use]
pub fn low_bits_mask(bit_count: usize) -> u64 {
    (1u64 << bit_count) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- carries ---

    #[test]
    fn carry_out_of_top_bit() {
        assert_eq!(add_with_carry(u64::MAX, 1, 0), (0, 1));
        assert_eq!(add_with_carry(u64::MAX, 0, 1), (0, 1));
        assert_eq!(add_with_carry(u64::MAX, u64::MAX, 1), (u64::MAX, 1));
        assert_eq!(add_with_carry(7, 8, 1), (16, 0));
    }

    #[test]
    fn borrow_below_zero() {
        assert_eq!(sub_with_borrow(0, 0, 1), (u64::MAX, 1));
        assert_eq!(sub_with_borrow(3, 1, 1), (1, 0));
        assert_eq!(sub_with_borrow(1, u64::MAX, 0), (2, 1));
        assert_eq!(sub_with_borrow(u64::MAX, u64::MAX, 1), (u64::MAX, 1));
    }

    #[test]
    fn wide_product_is_low_then_high() {
        assert_eq!(mul_wide(1 << 32, 1 << 32), (0, 1));
        assert_eq!(mul_wide(u64::MAX, 3), (u64::MAX - 2, 2));
        assert_eq!(mul_wide(u64::MAX, u64::MAX), (1, u64::MAX - 1));
    }

    #[test]
    fn wide_product_absorbs_two_carries() {
        let (low, high) = mul_wide(u64::MAX, u64::MAX);
        let (low, c1) = add_with_carry(low, u64::MAX, 0);
        let (low, c2) = add_with_carry(low, u64::MAX, 0);
        assert_eq!((low, high + c1 + c2), (u64::MAX, u64::MAX));
    }

    // --- bit queries ---

    #[test]
    fn bit_counts() {
        assert_eq!(significant_bit_count(0), 0);
        assert_eq!(significant_bit_count(1), 1);
        assert_eq!(significant_bit_count(0xFF), 8);
        assert_eq!(significant_bit_count(u64::MAX), 64);
    }

    #[test]
    fn powers_of_two() {
        assert_eq!(power_of_two(0), None);
        assert_eq!(power_of_two(1), Some(0));
        assert_eq!(power_of_two(1 << 40), Some(40));
        assert_eq!(power_of_two(6), None);
    }

    #[test]
    fn powers_of_two_minus_one() {
        assert_eq!(power_of_two_minus_one(0), None);
        assert_eq!(power_of_two_minus_one(1), Some(1));
        assert_eq!(power_of_two_minus_one(31), Some(5));
        assert_eq!(power_of_two_minus_one(u64::MAX), Some(64));
        assert_eq!(power_of_two_minus_one(30), None);
    }

    #[test]
    fn masks() {
        assert_eq!(low_bits_mask(0), 0);
        assert_eq!(low_bits_mask(5), 31);
        assert_eq!(low_bits_mask(63), u64::MAX >> 1);
    }
}
