//! Arithmetic on operands already reduced modulo a [`Modulus`].
//!
//! Every operand and result has the modulus width. The checked forms verify
//! widths and that inputs are below the modulus; the `_unchecked` forms trust
//! the caller.

use hemath_memory::MemoryPool;

use crate::arith::{
    add_uint_uint_inplace, add_uint_uint_unchecked, increment_uint_unchecked,
    right_shift_uint_inplace_unchecked, sub_uint_uint64_inplace, sub_uint_uint_inplace,
    sub_uint_uint_unchecked,
};
use crate::error::{ensure_len, ensure_nonempty, ArithError};
use crate::modulus::Modulus;
use crate::multiply::multiply_uint_uint;
use crate::reduce::modulo_uint_inplace;
use crate::uint::{
    allocate_uint, get_significant_bit_count_uint, is_bit_set_uint_unchecked,
    is_greater_than_or_equal_uint_uint, is_less_than_uint_uint, is_zero_uint, set_uint_uint,
    set_uint_unchecked, set_zero_uint,
};
use crate::word::mul_wide;

fn ensure_operand(
    name: &'static str,
    operand: &[u64],
    modulus: &Modulus,
) -> Result<(), ArithError> {
    ensure_len(name, modulus.uint64_count(), operand.len())?;
    if is_less_than_uint_uint(operand, modulus.value()) {
        Ok(())
    } else {
        Err(ArithError::NotReduced(name))
    }
}

fn ensure_result(result: &[u64], modulus: &Modulus) -> Result<(), ArithError> {
    ensure_len("result", modulus.uint64_count(), result.len())
}

// --- unary ---

/// `result = operand + 1 mod modulus`.
pub fn increment_uint_mod(
    operand: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_operand("operand", operand, modulus)?;
    ensure_result(result, modulus)?;
    increment_uint_mod_unchecked(operand, modulus, result);
    Ok(())
}

/// Unchecked form of [`increment_uint_mod`].
pub fn increment_uint_mod_unchecked(operand: &[u64], modulus: &Modulus, result: &mut [u64]) {
    let carry = increment_uint_unchecked(operand, result);
    if carry || is_greater_than_or_equal_uint_uint(result, modulus.value()) {
        sub_uint_uint_inplace(result, modulus.value());
    }
}

/// `result = operand - 1 mod modulus`.
pub fn decrement_uint_mod(
    operand: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_operand("operand", operand, modulus)?;
    ensure_result(result, modulus)?;
    decrement_uint_mod_unchecked(operand, modulus, result);
    Ok(())
}

/// Unchecked form of [`decrement_uint_mod`].
pub fn decrement_uint_mod_unchecked(operand: &[u64], modulus: &Modulus, result: &mut [u64]) {
    if is_zero_uint(operand) {
        result.copy_from_slice(modulus.value());
    } else {
        result.copy_from_slice(operand);
    }
    sub_uint_uint64_inplace(result, 1);
}

/// `result = -operand mod modulus`; zero stays zero.
pub fn negate_uint_mod(
    operand: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_operand("operand", operand, modulus)?;
    ensure_result(result, modulus)?;
    negate_uint_mod_unchecked(operand, modulus, result);
    Ok(())
}

/// Unchecked form of [`negate_uint_mod`].
pub fn negate_uint_mod_unchecked(operand: &[u64], modulus: &Modulus, result: &mut [u64]) {
    if is_zero_uint(operand) {
        set_zero_uint(result);
    } else {
        sub_uint_uint_unchecked(modulus.value(), operand, result);
    }
}

/// `result = operand / 2 mod modulus`, for an odd modulus.
pub fn div2_uint_mod(
    operand: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_operand("operand", operand, modulus)?;
    ensure_result(result, modulus)?;
    if modulus.value()[0] & 1 == 0 {
        return Err(ArithError::EvenModulus);
    }
    div2_uint_mod_unchecked(operand, modulus, result);
    Ok(())
}

/// Unchecked form of [`div2_uint_mod`].
pub fn div2_uint_mod_unchecked(operand: &[u64], modulus: &Modulus, result: &mut [u64]) {
    if operand.first().is_some_and(|&word| word & 1 == 1) {
        // (operand + modulus) is even; its carry becomes the new top bit
        let carry = add_uint_uint_unchecked(operand, modulus.value(), result);
        right_shift_uint_inplace_unchecked(result, 1);
        if carry {
            if let Some(top) = result.last_mut() {
                *top |= 1 << 63;
            }
        }
    } else {
        result.copy_from_slice(operand);
        right_shift_uint_inplace_unchecked(result, 1);
    }
}

// --- binary ---

/// `result = a + b mod modulus`.
pub fn add_uint_uint_mod(
    a: &[u64],
    b: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_operand("a", a, modulus)?;
    ensure_operand("b", b, modulus)?;
    ensure_result(result, modulus)?;
    add_uint_uint_mod_unchecked(a, b, modulus, result);
    Ok(())
}

/// Unchecked form of [`add_uint_uint_mod`].
pub fn add_uint_uint_mod_unchecked(a: &[u64], b: &[u64], modulus: &Modulus, result: &mut [u64]) {
    let carry = add_uint_uint_unchecked(a, b, result);
    if carry || is_greater_than_or_equal_uint_uint(result, modulus.value()) {
        sub_uint_uint_inplace(result, modulus.value());
    }
}

/// `result = a - b mod modulus`.
pub fn sub_uint_uint_mod(
    a: &[u64],
    b: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_operand("a", a, modulus)?;
    ensure_operand("b", b, modulus)?;
    ensure_result(result, modulus)?;
    sub_uint_uint_mod_unchecked(a, b, modulus, result);
    Ok(())
}

/// Unchecked form of [`sub_uint_uint_mod`].
pub fn sub_uint_uint_mod_unchecked(a: &[u64], b: &[u64], modulus: &Modulus, result: &mut [u64]) {
    if sub_uint_uint_unchecked(a, b, result) {
        add_uint_uint_inplace(result, modulus.value());
    }
}

/// `result = a * b mod modulus`.
///
/// Barrett-capable single-word moduli reduce the 128-bit product directly;
/// wider moduli multiply into a double-width scratch buffer and reduce it.
pub fn multiply_uint_uint_mod<P: MemoryPool>(
    a: &[u64],
    b: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
    pool: &P,
) -> Result<(), ArithError> {
    ensure_operand("a", a, modulus)?;
    ensure_operand("b", b, modulus)?;
    ensure_result(result, modulus)?;
    multiply_uint_uint_mod_unchecked(a, b, modulus, result, pool);
    Ok(())
}

/// Unchecked form of [`multiply_uint_uint_mod`].
pub fn multiply_uint_uint_mod_unchecked<P: MemoryPool>(
    a: &[u64],
    b: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
    pool: &P,
) {
    if modulus.uint64_count() == 1 && modulus.is_barrett_capable() {
        let (low, high) = mul_wide(a[0], b[0]);
        result[0] = modulus.barrett_reduce_128_unchecked([low, high]);
        return;
    }
    let mut product = allocate_uint(2 * modulus.uint64_count(), pool);
    multiply_uint_uint(a, b, &mut product);
    modulo_uint_inplace(&mut product, modulus, pool);
    set_uint_uint(&product, result);
}

/// `result = operand^exponent mod modulus`; the exponent may have any width.
///
/// `0^0` is taken as one.
pub fn exponentiate_uint_mod<P: MemoryPool>(
    operand: &[u64],
    exponent: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
    pool: &P,
) -> Result<(), ArithError> {
    ensure_operand("operand", operand, modulus)?;
    ensure_nonempty("exponent", exponent.len())?;
    ensure_result(result, modulus)?;
    exponentiate_uint_mod_unchecked(operand, exponent, modulus, result, pool);
    Ok(())
}

/// Unchecked form of [`exponentiate_uint_mod`].
pub fn exponentiate_uint_mod_unchecked<P: MemoryPool>(
    operand: &[u64],
    exponent: &[u64],
    modulus: &Modulus,
    result: &mut [u64],
    pool: &P,
) {
    let exponent_bits = get_significant_bit_count_uint(exponent);
    set_uint_unchecked(1, result);
    if is_greater_than_or_equal_uint_uint(result, modulus.value()) {
        // modulus is one
        set_zero_uint(result);
        return;
    }
    if exponent_bits == 0 {
        return;
    }
    if is_zero_uint(operand) {
        set_zero_uint(result);
        return;
    }

    let uint64_count = modulus.uint64_count();
    let mut power = allocate_uint(uint64_count, pool);
    power.copy_from_slice(operand);
    let mut scratch = allocate_uint(uint64_count, pool);
    for bit in 0..exponent_bits {
        if is_bit_set_uint_unchecked(exponent, bit) {
            multiply_uint_uint_mod_unchecked(result, &power, modulus, &mut scratch, pool);
            result.copy_from_slice(&scratch);
        }
        if bit + 1 < exponent_bits {
            multiply_uint_uint_mod_unchecked(&power, &power, modulus, &mut scratch, pool);
            power.swap_with_slice(&mut scratch);
        }
    }
}

/// `result = operand^exponent mod modulus` for a single-word exponent.
pub fn exponentiate_uint_mod_u64<P: MemoryPool>(
    operand: &[u64],
    exponent: u64,
    modulus: &Modulus,
    result: &mut [u64],
    pool: &P,
) -> Result<(), ArithError> {
    exponentiate_uint_mod(operand, &[exponent], modulus, result, pool)
}
