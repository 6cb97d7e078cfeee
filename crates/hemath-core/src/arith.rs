//! Carry-propagating addition, subtraction, shifts and bitwise operations.

use crate::constants::BITS_PER_UINT64;
use crate::error::{ensure_len, ArithError};
use crate::uint::{is_high_bit_set_uint, is_zero_uint};
use crate::word::{add_with_carry, sub_with_borrow};

// --- increment, decrement, negate ---

/// `result = operand + 1`; returns the carry out.
pub fn increment_uint(operand: &[u64], result: &mut [u64]) -> Result<bool, ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    Ok(increment_uint_unchecked(operand, result))
}

/// Unchecked form of [`increment_uint`].
pub fn increment_uint_unchecked(operand: &[u64], result: &mut [u64]) -> bool {
    result.copy_from_slice(operand);
    increment_uint_inplace(result)
}

/// `value += 1`; returns the carry out.
pub fn increment_uint_inplace(value: &mut [u64]) -> bool {
    add_uint_uint64_inplace(value, 1)
}

/// `result = operand - 1`; returns the borrow out.
pub fn decrement_uint(operand: &[u64], result: &mut [u64]) -> Result<bool, ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    Ok(decrement_uint_unchecked(operand, result))
}

/// Unchecked form of [`decrement_uint`].
pub fn decrement_uint_unchecked(operand: &[u64], result: &mut [u64]) -> bool {
    result.copy_from_slice(operand);
    decrement_uint_inplace(result)
}

/// `value -= 1`; returns the borrow out.
pub fn decrement_uint_inplace(value: &mut [u64]) -> bool {
    sub_uint_uint64_inplace(value, 1)
}

/// Two's complement negation: `result = 2^(64n) - operand`.
pub fn negate_uint(operand: &[u64], result: &mut [u64]) -> Result<(), ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    negate_uint_unchecked(operand, result);
    Ok(())
}

/// Unchecked form of [`negate_uint`].
pub fn negate_uint_unchecked(operand: &[u64], result: &mut [u64]) {
    result.copy_from_slice(operand);
    negate_uint_inplace(result);
}

/// In-place two's complement negation.
pub fn negate_uint_inplace(value: &mut [u64]) {
    let mut carry = 1;
    for word in value.iter_mut() {
        let (sum, c) = add_with_carry(!*word, 0, carry);
        *word = sum;
        carry = c;
    }
}

// --- shifts ---

fn ensure_shift(uint64_count: usize, shift_amount: usize) -> Result<(), ArithError> {
    let width = uint64_count * BITS_PER_UINT64;
    if shift_amount > width {
        return Err(ArithError::ShiftOutOfRange {
            amount: shift_amount,
            width,
        });
    }
    Ok(())
}

/// `result = operand << shift_amount`, truncated to the operand width.
pub fn left_shift_uint(
    operand: &[u64],
    shift_amount: usize,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    ensure_shift(operand.len(), shift_amount)?;
    left_shift_uint_unchecked(operand, shift_amount, result);
    Ok(())
}

/// Unchecked form of [`left_shift_uint`].
pub fn left_shift_uint_unchecked(operand: &[u64], shift_amount: usize, result: &mut [u64]) {
    result.copy_from_slice(operand);
    left_shift_uint_inplace_unchecked(result, shift_amount);
}

/// `value <<= shift_amount`.
pub fn left_shift_uint_inplace(value: &mut [u64], shift_amount: usize) -> Result<(), ArithError> {
    ensure_shift(value.len(), shift_amount)?;
    left_shift_uint_inplace_unchecked(value, shift_amount);
    Ok(())
}

/// Unchecked form of [`left_shift_uint_inplace`].
pub fn left_shift_uint_inplace_unchecked(value: &mut [u64], shift_amount: usize) {
    if shift_amount == 0 {
        return;
    }
    let word_shift = shift_amount / BITS_PER_UINT64;
    let bit_shift = shift_amount % BITS_PER_UINT64;
    // high to low, so every source word is read before it is overwritten
    for i in (0..value.len()).rev() {
        let curr = if i >= word_shift { value[i - word_shift] } else { 0 };
        value[i] = if bit_shift > 0 {
            let prior = if i > word_shift {
                value[i - word_shift - 1]
            } else {
                0
            };
            (curr << bit_shift) | (prior >> (BITS_PER_UINT64 - bit_shift))
        } else {
            curr
        };
    }
}

/// `result = operand >> shift_amount`.
pub fn right_shift_uint(
    operand: &[u64],
    shift_amount: usize,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    ensure_shift(operand.len(), shift_amount)?;
    right_shift_uint_unchecked(operand, shift_amount, result);
    Ok(())
}

/// Unchecked form of [`right_shift_uint`].
pub fn right_shift_uint_unchecked(operand: &[u64], shift_amount: usize, result: &mut [u64]) {
    result.copy_from_slice(operand);
    right_shift_uint_inplace_unchecked(result, shift_amount);
}

/// `value >>= shift_amount`.
pub fn right_shift_uint_inplace(value: &mut [u64], shift_amount: usize) -> Result<(), ArithError> {
    ensure_shift(value.len(), shift_amount)?;
    right_shift_uint_inplace_unchecked(value, shift_amount);
    Ok(())
}

/// Unchecked form of [`right_shift_uint_inplace`].
pub fn right_shift_uint_inplace_unchecked(value: &mut [u64], shift_amount: usize) {
    if shift_amount == 0 {
        return;
    }
    shift_right_filling(value, shift_amount, 0);
}

/// Arithmetic right shift: vacated high bits copy the operand's top bit.
pub fn right_shift_sign_extend_uint(
    operand: &[u64],
    shift_amount: usize,
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    ensure_shift(operand.len(), shift_amount)?;
    right_shift_sign_extend_uint_unchecked(operand, shift_amount, result);
    Ok(())
}

/// Unchecked form of [`right_shift_sign_extend_uint`].
pub fn right_shift_sign_extend_uint_unchecked(
    operand: &[u64],
    shift_amount: usize,
    result: &mut [u64],
) {
    result.copy_from_slice(operand);
    if shift_amount == 0 {
        return;
    }
    let fill = if is_high_bit_set_uint(operand) { u64::MAX } else { 0 };
    shift_right_filling(result, shift_amount, fill);
}

// low to high, so every source word is read before it is overwritten
fn shift_right_filling(value: &mut [u64], shift_amount: usize, fill: u64) {
    let count = value.len();
    let word_shift = shift_amount / BITS_PER_UINT64;
    let bit_shift = shift_amount % BITS_PER_UINT64;
    for i in 0..count {
        let curr = if i + word_shift < count {
            value[i + word_shift]
        } else {
            fill
        };
        value[i] = if bit_shift > 0 {
            let next = if i + word_shift + 1 < count {
                value[i + word_shift + 1]
            } else {
                fill
            };
            (curr >> bit_shift) | (next << (BITS_PER_UINT64 - bit_shift))
        } else {
            curr
        };
    }
}

/// `result = ceil(operand / 2)`, computed as `(operand >> 1) + (operand & 1)`.
pub fn half_round_up_uint(operand: &[u64], result: &mut [u64]) -> Result<(), ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    half_round_up_uint_unchecked(operand, result);
    Ok(())
}

/// Unchecked form of [`half_round_up_uint`].
pub fn half_round_up_uint_unchecked(operand: &[u64], result: &mut [u64]) {
    let Some(&low) = operand.first() else {
        return;
    };
    right_shift_uint_unchecked(operand, 1, result);
    if low & 1 != 0 {
        increment_uint_inplace(result);
    }
}

// --- bitwise ---

/// `result = !operand`.
pub fn not_uint(operand: &[u64], result: &mut [u64]) -> Result<(), ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    not_uint_unchecked(operand, result);
    Ok(())
}

/// Unchecked form of [`not_uint`].
pub fn not_uint_unchecked(operand: &[u64], result: &mut [u64]) {
    for (r, &x) in result.iter_mut().zip(operand) {
        *r = !x;
    }
}

fn ensure_binary(a: &[u64], b: &[u64], result: &[u64]) -> Result<(), ArithError> {
    ensure_len("b", a.len(), b.len())?;
    ensure_len("result", a.len(), result.len())
}

fn zip_words(a: &[u64], b: &[u64], result: &mut [u64], op: impl Fn(u64, u64) -> u64) {
    for ((r, &x), &y) in result.iter_mut().zip(a).zip(b) {
        *r = op(x, y);
    }
}

/// `result = a & b`.
pub fn and_uint_uint(a: &[u64], b: &[u64], result: &mut [u64]) -> Result<(), ArithError> {
    ensure_binary(a, b, result)?;
    and_uint_uint_unchecked(a, b, result);
    Ok(())
}

/// Unchecked form of [`and_uint_uint`].
pub fn and_uint_uint_unchecked(a: &[u64], b: &[u64], result: &mut [u64]) {
    zip_words(a, b, result, |x, y| x & y);
}

/// `result = a | b`.
pub fn or_uint_uint(a: &[u64], b: &[u64], result: &mut [u64]) -> Result<(), ArithError> {
    ensure_binary(a, b, result)?;
    or_uint_uint_unchecked(a, b, result);
    Ok(())
}

/// Unchecked form of [`or_uint_uint`].
pub fn or_uint_uint_unchecked(a: &[u64], b: &[u64], result: &mut [u64]) {
    zip_words(a, b, result, |x, y| x | y);
}

/// `result = a ^ b`.
pub fn xor_uint_uint(a: &[u64], b: &[u64], result: &mut [u64]) -> Result<(), ArithError> {
    ensure_binary(a, b, result)?;
    xor_uint_uint_unchecked(a, b, result);
    Ok(())
}

/// Unchecked form of [`xor_uint_uint`].
pub fn xor_uint_uint_unchecked(a: &[u64], b: &[u64], result: &mut [u64]) {
    zip_words(a, b, result, |x, y| x ^ y);
}

// --- addition and subtraction ---

/// `result = a + b + carry` over `result.len()` words.
///
/// Operands of any width are zero-extended; words past `result.len()` are
/// dropped. Returns the carry out of the top result word.
pub fn add_uint_uint_carry(a: &[u64], b: &[u64], carry: bool, result: &mut [u64]) -> bool {
    let mut carry = u64::from(carry);
    for (i, r) in result.iter_mut().enumerate() {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        let (sum, c) = add_with_carry(x, y, carry);
        *r = sum;
        carry = c;
    }
    carry != 0
}

/// `result = a - b - borrow` over `result.len()` words; returns the borrow out.
pub fn sub_uint_uint_borrow(a: &[u64], b: &[u64], borrow: bool, result: &mut [u64]) -> bool {
    let mut borrow = u64::from(borrow);
    for (i, r) in result.iter_mut().enumerate() {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        let (diff, b) = sub_with_borrow(x, y, borrow);
        *r = diff;
        borrow = b;
    }
    borrow != 0
}

/// `result = a + b` over equal widths; returns the carry out.
pub fn add_uint_uint(a: &[u64], b: &[u64], result: &mut [u64]) -> Result<bool, ArithError> {
    ensure_binary(a, b, result)?;
    Ok(add_uint_uint_unchecked(a, b, result))
}

/// Unchecked form of [`add_uint_uint`].
pub fn add_uint_uint_unchecked(a: &[u64], b: &[u64], result: &mut [u64]) -> bool {
    add_uint_uint_carry(a, b, false, result)
}

/// `result = a - b` over equal widths; returns the borrow out.
pub fn sub_uint_uint(a: &[u64], b: &[u64], result: &mut [u64]) -> Result<bool, ArithError> {
    ensure_binary(a, b, result)?;
    Ok(sub_uint_uint_unchecked(a, b, result))
}

/// Unchecked form of [`sub_uint_uint`].
pub fn sub_uint_uint_unchecked(a: &[u64], b: &[u64], result: &mut [u64]) -> bool {
    sub_uint_uint_borrow(a, b, false, result)
}

/// `acc += addend`, zero-extending `addend`; returns the carry out.
///
/// Words of `addend` past `acc.len()` are ignored.
pub fn add_uint_uint_inplace(acc: &mut [u64], addend: &[u64]) -> bool {
    let mut carry = 0;
    for (i, word) in acc.iter_mut().enumerate() {
        let y = addend.get(i).copied().unwrap_or(0);
        if y == 0 && carry == 0 && i >= addend.len() {
            break;
        }
        let (sum, c) = add_with_carry(*word, y, carry);
        *word = sum;
        carry = c;
    }
    carry != 0
}

/// `acc -= subtrahend`, zero-extending `subtrahend`; returns the borrow out.
pub fn sub_uint_uint_inplace(acc: &mut [u64], subtrahend: &[u64]) -> bool {
    let mut borrow = 0;
    for (i, word) in acc.iter_mut().enumerate() {
        let y = subtrahend.get(i).copied().unwrap_or(0);
        if y == 0 && borrow == 0 && i >= subtrahend.len() {
            break;
        }
        let (diff, b) = sub_with_borrow(*word, y, borrow);
        *word = diff;
        borrow = b;
    }
    borrow != 0
}

/// `result = operand + scalar`; returns the carry out.
pub fn add_uint_uint64(
    operand: &[u64],
    scalar: u64,
    result: &mut [u64],
) -> Result<bool, ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    result.copy_from_slice(operand);
    Ok(add_uint_uint64_inplace(result, scalar))
}

/// `result = operand - scalar`; returns the borrow out.
pub fn sub_uint_uint64(
    operand: &[u64],
    scalar: u64,
    result: &mut [u64],
) -> Result<bool, ArithError> {
    ensure_len("result", operand.len(), result.len())?;
    result.copy_from_slice(operand);
    Ok(sub_uint_uint64_inplace(result, scalar))
}

/// Add a scalar to a word slice, returning the carry out.
pub fn add_uint_uint64_inplace(value: &mut [u64], scalar: u64) -> bool {
    let mut carry = scalar;
    for word in value.iter_mut() {
        let (sum, c) = add_with_carry(*word, carry, 0);
        *word = sum;
        carry = c;
        if carry == 0 {
            break;
        }
    }
    carry != 0
}

/// Subtract a scalar from a word slice, returning the borrow out.
pub fn sub_uint_uint64_inplace(value: &mut [u64], scalar: u64) -> bool {
    let mut borrow = scalar;
    for word in value.iter_mut() {
        let (diff, b) = sub_with_borrow(*word, borrow, 0);
        *word = diff;
        borrow = b;
        if borrow == 0 {
            break;
        }
    }
    borrow != 0
}

/// Whether `value` is nonzero and its two's complement sign bit is set.
pub fn is_negative_uint(value: &[u64]) -> bool {
    !is_zero_uint(value) && is_high_bit_set_uint(value)
}
