//! Division and remainder by a [`Modulus`].
//!
//! Dispatch order: a value that fits one word uses native division; a `2^k`
//! modulus splits the value with a shift and a mask; a `2^k - 1` modulus
//! folds the high bits onto the low bits; a modulus with a small negated
//! inverse multiplies the high bits by it and adds them back; anything else
//! falls through to bit-serial long division. Every path can accumulate the
//! quotient.

use hemath_memory::MemoryPool;
use tracing::trace;

use crate::arith::{
    add_uint_uint64_inplace, add_uint_uint_inplace, right_shift_uint_unchecked,
    sub_uint_uint_inplace,
};
use crate::constants::BITS_PER_UINT64;
use crate::divide::long_divide;
use crate::error::{ensure_len, ArithError};
use crate::modulus::Modulus;
use crate::multiply::multiply_uint_uint;
use crate::uint::{
    allocate_uint, filter_highbits_uint_unchecked, get_significant_bit_count_uint,
    get_power_of_two_uint, is_greater_than_or_equal_uint_uint, is_less_than_uint_uint,
    set_uint_uint, set_zero_uint,
};

/// Divide by `modulus` in place: `numerator` becomes the remainder.
///
/// `quotient` must be as wide as `numerator`.
pub fn divide_and_reduce<P: MemoryPool>(
    numerator: &mut [u64],
    modulus: &Modulus,
    quotient: &mut [u64],
    pool: &P,
) -> Result<(), ArithError> {
    ensure_len("quotient", numerator.len(), quotient.len())?;
    divide_and_reduce_unchecked(numerator, modulus, quotient, pool);
    Ok(())
}

/// Unchecked form of [`divide_and_reduce`].
pub fn divide_and_reduce_unchecked<P: MemoryPool>(
    numerator: &mut [u64],
    modulus: &Modulus,
    quotient: &mut [u64],
    pool: &P,
) {
    reduce(numerator, modulus, Some(quotient), pool);
}

/// Reduce `value` modulo `modulus` in place. `value` may have any width.
pub fn modulo_uint_inplace<P: MemoryPool>(value: &mut [u64], modulus: &Modulus, pool: &P) {
    reduce(value, modulus, None, pool);
}

/// `result = value mod modulus`, where `result` has the modulus width.
pub fn modulo_uint<P: MemoryPool>(
    value: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
    pool: &P,
) -> Result<(), ArithError> {
    ensure_len("result", modulus.uint64_count(), result.len())?;
    modulo_uint_unchecked(value, modulus, result, pool);
    Ok(())
}

/// Unchecked form of [`modulo_uint`].
pub fn modulo_uint_unchecked<P: MemoryPool>(
    value: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
    pool: &P,
) {
    if value.len() <= result.len() {
        set_uint_uint(value, result);
        reduce(result, modulus, None, pool);
        return;
    }
    let mut scratch = allocate_uint(value.len(), pool);
    scratch.copy_from_slice(value);
    reduce(&mut scratch, modulus, None, pool);
    set_uint_uint(&scratch, result);
}

fn reduce<P: MemoryPool>(
    value: &mut [u64],
    modulus: &Modulus,
    mut quotient: Option<&mut [u64]>,
    pool: &P,
) {
    if let Some(q) = quotient.as_deref_mut() {
        set_zero_uint(q);
    }
    if value.is_empty() {
        return;
    }

    let modulus_bits = modulus.significant_bit_count();
    let value_bits = get_significant_bit_count_uint(value);
    if value_bits < modulus_bits {
        return;
    }
    let uint64_count = value_bits.div_ceil(BITS_PER_UINT64);
    let value = &mut value[..uint64_count];
    if value_bits == modulus_bits && is_less_than_uint_uint(value, modulus.value()) {
        return;
    }

    if uint64_count == 1 {
        let m = modulus.value()[0];
        if let Some(q) = quotient.as_deref_mut() {
            q[0] = value[0] / m;
        }
        value[0] %= m;
        return;
    }

    if let Some(k) = get_power_of_two_uint(modulus.value()) {
        trace!(bits = value_bits, k, "reducing by 2^k");
        if let Some(q) = quotient.as_deref_mut() {
            right_shift_uint_unchecked(value, k, &mut q[..uint64_count]);
        }
        filter_highbits_uint_unchecked(value, k);
    } else if let Some(k) = modulus.power_of_two_minus_one().filter(|&k| k >= 2) {
        trace!(bits = value_bits, k, "reducing by 2^k - 1");
        reduce_power_of_two_minus_one(value, modulus, k, quotient, pool);
    } else if let Some(inverse) = modulus.inverse() {
        trace!(bits = value_bits, modulus_bits, "reducing with small inverse");
        reduce_small_inverse(value, modulus, inverse, quotient, pool);
    } else {
        trace!(bits = value_bits, modulus_bits, "reducing by long division");
        long_divide(value, modulus.value(), quotient, pool);
    }
}

// value = hi * 2^k + lo = hi * (2^k - 1) + (hi + lo)
fn reduce_power_of_two_minus_one<P: MemoryPool>(
    value: &mut [u64],
    modulus: &Modulus,
    k: usize,
    mut quotient: Option<&mut [u64]>,
    pool: &P,
) {
    let mut uint64_count = value.len();
    let mut value_bits = get_significant_bit_count_uint(value);
    let mut high = allocate_uint(uint64_count, pool);
    while value_bits > k + 1 {
        let current = &mut value[..uint64_count];
        let high = &mut high[..uint64_count];
        right_shift_uint_unchecked(current, k, high);
        filter_highbits_uint_unchecked(current, k);
        add_uint_uint_inplace(current, high);
        if let Some(q) = quotient.as_deref_mut() {
            add_uint_uint_inplace(q, high);
        }
        value_bits = get_significant_bit_count_uint(current);
        uint64_count = value_bits.div_ceil(BITS_PER_UINT64);
    }
    subtract_remaining(value, modulus, quotient);
}

// value = hi * 2^b + lo = hi * m + (hi * inverse + lo), since inverse = 2^b - m;
// a power-of-two modulus never gets here, its filtered inverse would be zero
fn reduce_small_inverse<P: MemoryPool>(
    value: &mut [u64],
    modulus: &Modulus,
    inverse: &[u64],
    mut quotient: Option<&mut [u64]>,
    pool: &P,
) {
    let modulus_bits = modulus.significant_bit_count();
    let mut uint64_count = value.len();
    let mut value_bits = get_significant_bit_count_uint(value);
    let mut high = allocate_uint(uint64_count, pool);
    let mut product = allocate_uint(uint64_count, pool);
    while value_bits > modulus_bits + 1 {
        let current = &mut value[..uint64_count];
        let high = &mut high[..uint64_count];
        let product = &mut product[..uint64_count];
        right_shift_uint_unchecked(current, modulus_bits, high);
        filter_highbits_uint_unchecked(current, modulus_bits);
        multiply_uint_uint(high, inverse, product);
        add_uint_uint_inplace(current, product);
        if let Some(q) = quotient.as_deref_mut() {
            add_uint_uint_inplace(q, high);
        }
        value_bits = get_significant_bit_count_uint(current);
        uint64_count = value_bits.div_ceil(BITS_PER_UINT64);
    }
    subtract_remaining(value, modulus, quotient);
}

// the folded value is at most a few multiples of the modulus
fn subtract_remaining(value: &mut [u64], modulus: &Modulus, mut quotient: Option<&mut [u64]>) {
    while is_greater_than_or_equal_uint_uint(value, modulus.value()) {
        sub_uint_uint_inplace(value, modulus.value());
        if let Some(q) = quotient.as_deref_mut() {
            add_uint_uint64_inplace(q, 1);
        }
    }
}
