//! Truncating schoolbook multiplication.

use crate::error::{ensure_len, ArithError};
use crate::uint::{get_significant_uint64_count_uint, set_uint_uint, set_zero_uint};
use crate::word::{add_with_carry, mul_wide};

/// `result = operand * scalar`, truncated to `result.len()` words.
pub fn multiply_uint_uint64(operand: &[u64], scalar: u64, result: &mut [u64]) {
    let mut carry = 0;
    for (i, r) in result.iter_mut().enumerate() {
        let x = operand.get(i).copied().unwrap_or(0);
        let (low, high) = mul_wide(x, scalar);
        let (sum, c) = add_with_carry(low, carry, 0);
        *r = sum;
        carry = high + c;
    }
}

/// `result = a * b`, truncated to `result.len()` words.
///
/// Operands may have any widths; words of the product at or above
/// `result.len()` are never computed.
pub fn multiply_uint_uint(a: &[u64], b: &[u64], result: &mut [u64]) {
    let a_len = get_significant_uint64_count_uint(a);
    let b_len = get_significant_uint64_count_uint(b);
    if a_len == 0 || b_len == 0 {
        set_zero_uint(result);
        return;
    }
    if result.len() == 1 {
        result[0] = a[0].wrapping_mul(b[0]);
        return;
    }
    if a_len == 1 {
        if a[0] == 1 {
            set_uint_uint(&b[..b_len], result);
        } else {
            multiply_uint_uint64(&b[..b_len], a[0], result);
        }
        return;
    }
    if b_len == 1 {
        if b[0] == 1 {
            set_uint_uint(&a[..a_len], result);
        } else {
            multiply_uint_uint64(&a[..a_len], b[0], result);
        }
        return;
    }

    set_zero_uint(result);
    let result_len = result.len();
    for (i, &x) in a[..a_len.min(result_len)].iter().enumerate() {
        let limit = b_len.min(result_len - i);
        let mut carry = 0;
        for (j, &y) in b[..limit].iter().enumerate() {
            let (low, high) = mul_wide(x, y);
            let (sum, c1) = add_with_carry(low, result[i + j], 0);
            let (sum, c2) = add_with_carry(sum, carry, 0);
            result[i + j] = sum;
            carry = high + c1 + c2;
        }
        // row i has only touched words below i + b_len so far
        if i + limit < result_len {
            result[i + limit] = carry;
        }
    }
}

/// `result = a * b` where all three share one width; the product is truncated.
pub fn multiply_truncate_uint_uint(
    a: &[u64],
    b: &[u64],
    result: &mut [u64],
) -> Result<(), ArithError> {
    ensure_len("b", a.len(), b.len())?;
    ensure_len("result", a.len(), result.len())?;
    multiply_uint_uint(a, b, result);
    Ok(())
}
