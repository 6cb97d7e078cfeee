//! Modular inverses and primitive roots of unity.

use std::mem;

use hemath_memory::MemoryPool;
use rand::RngCore;
use tracing::debug;

use crate::arith::{
    add_uint_uint_inplace, decrement_uint_unchecked, negate_uint_inplace, sub_uint_uint_unchecked,
};
use crate::divide::{divide_uint_uint_inplace_unchecked, long_divide};
use crate::error::{ensure_len, ensure_nonempty, ArithError};
use crate::modarith::{
    exponentiate_uint_mod_unchecked, increment_uint_mod_unchecked,
    multiply_uint_uint_mod_unchecked,
};
use crate::modulus::Modulus;
use crate::multiply::multiply_uint_uint;
use crate::options::SearchOptions;
use crate::reduce::modulo_uint_inplace;
use crate::uint::{
    allocate_uint, get_significant_bit_count_uint, is_equal_uint,
    is_less_than_uint_uint, is_zero_uint, set_uint_uint, set_uint_unchecked, set_zero_uint,
};

// --- inverse ---

/// The inverse of `operand` modulo `modulus`, or `None` when they share a
/// factor. `operand` must be below `modulus` and of the same width.
pub fn try_invert_uint_mod<P: MemoryPool>(
    operand: &[u64],
    modulus: &[u64],
    pool: &P,
) -> Result<Option<Vec<u64>>, ArithError> {
    let mut result = vec![0; modulus.len()];
    let found = try_invert_uint_mod_into(operand, modulus, &mut result, pool)?;
    Ok(found.then_some(result))
}

/// Write the inverse of `operand` into `result`; returns whether it exists.
pub fn try_invert_uint_mod_into<P: MemoryPool>(
    operand: &[u64],
    modulus: &[u64],
    result: &mut [u64],
    pool: &P,
) -> Result<bool, ArithError> {
    ensure_nonempty("modulus", modulus.len())?;
    ensure_len("operand", modulus.len(), operand.len())?;
    ensure_len("result", modulus.len(), result.len())?;
    if is_zero_uint(modulus) {
        return Err(ArithError::ZeroModulus);
    }
    if !is_less_than_uint_uint(operand, modulus) {
        return Err(ArithError::NotReduced("operand"));
    }
    Ok(try_invert_uint_mod_unchecked(operand, modulus, result, pool))
}

/// Unchecked form of [`try_invert_uint_mod_into`].
///
/// Extended Euclid over sign-and-magnitude coefficients. The remainder
/// sequence runs modulus, operand, ...; alongside it `prior` and `current`
/// hold the coefficients of the operand in the last two remainders.
pub fn try_invert_uint_mod_unchecked<P: MemoryPool>(
    operand: &[u64],
    modulus: &[u64],
    result: &mut [u64],
    pool: &P,
) -> bool {
    match get_significant_bit_count_uint(operand) {
        0 => return false,
        1 => {
            set_uint_unchecked(1, result);
            return true;
        }
        _ => {}
    }

    let uint64_count = modulus.len();
    let mut numerator = allocate_uint(uint64_count, pool);
    numerator.copy_from_slice(modulus);
    let mut denominator = allocate_uint(uint64_count, pool);
    denominator.copy_from_slice(operand);
    let mut quotient = allocate_uint(uint64_count, pool);
    let mut scratch = allocate_uint(uint64_count, pool);

    let mut prior = allocate_uint(uint64_count, pool);
    set_zero_uint(&mut prior);
    let mut prior_positive = true;
    let mut current = allocate_uint(uint64_count, pool);
    set_uint_unchecked(1, &mut current);
    let mut current_positive = true;
    let mut next = allocate_uint(uint64_count, pool);

    loop {
        long_divide(&mut numerator, &denominator, Some(quotient.as_mut_slice()), pool);
        if is_zero_uint(&numerator) {
            break;
        }

        // next = prior - quotient * current
        multiply_uint_uint(&quotient, &current, &mut next);
        let mut next_positive = !current_positive;
        if prior_positive == next_positive {
            add_uint_uint_inplace(&mut next, &prior);
        } else {
            let borrow = sub_uint_uint_unchecked(&prior, &next, &mut scratch);
            mem::swap(&mut next, &mut scratch);
            if borrow {
                negate_uint_inplace(&mut next);
                next_positive = !prior_positive;
            } else {
                next_positive = prior_positive;
            }
        }

        mem::swap(&mut prior, &mut current);
        prior_positive = current_positive;
        mem::swap(&mut current, &mut next);
        current_positive = next_positive;

        // the remainder becomes the next divisor
        mem::swap(&mut numerator, &mut denominator);
    }

    if !is_equal_uint(&denominator, 1) {
        return false;
    }
    if current_positive || is_zero_uint(&current) {
        set_uint_uint(&current, result);
    } else {
        sub_uint_uint_unchecked(modulus, &current, result);
    }
    true
}

// --- primitive roots ---

fn ensure_prime_candidate(modulus: &Modulus) -> Result<(), ArithError> {
    if modulus.significant_bit_count() < 2 {
        return Err(ArithError::ModulusTooSmall(2));
    }
    Ok(())
}

fn is_valid_degree(degree: u64) -> bool {
    degree >= 2 && degree.is_power_of_two()
}

/// Whether `root` is a primitive `degree`-th root of unity modulo `modulus`.
///
/// For a power-of-two degree this holds exactly when
/// `root^(degree / 2) = -1`. Zero and degrees that are not a power of two of
/// at least two give `false`.
pub fn is_primitive_root<P: MemoryPool>(
    root: &[u64],
    degree: u64,
    modulus: &Modulus,
    pool: &P,
) -> Result<bool, ArithError> {
    ensure_prime_candidate(modulus)?;
    ensure_len("root", modulus.uint64_count(), root.len())?;
    if !is_less_than_uint_uint(root, modulus.value()) {
        return Err(ArithError::NotReduced("root"));
    }
    Ok(is_primitive_root_unchecked(root, degree, modulus, pool))
}

/// Unchecked form of [`is_primitive_root`].
pub fn is_primitive_root_unchecked<P: MemoryPool>(
    root: &[u64],
    degree: u64,
    modulus: &Modulus,
    pool: &P,
) -> bool {
    if is_zero_uint(root) || !is_valid_degree(degree) {
        return false;
    }
    let mut power = allocate_uint(modulus.uint64_count(), pool);
    exponentiate_uint_mod_unchecked(root, &[degree >> 1], modulus, &mut power, pool);
    let mut incremented = allocate_uint(modulus.uint64_count(), pool);
    increment_uint_mod_unchecked(&power, modulus, &mut incremented);
    is_zero_uint(&incremented)
}

/// Find a primitive `degree`-th root of unity modulo a prime, drawing
/// candidates from the thread RNG with the default attempt budget.
pub fn try_primitive_root<P: MemoryPool>(
    degree: u64,
    modulus: &Modulus,
    pool: &P,
) -> Result<Option<Vec<u64>>, ArithError> {
    try_primitive_root_with_rng(degree, modulus, &mut rand::rng(), SearchOptions::default(), pool)
}

/// Find a primitive `degree`-th root of unity modulo a prime.
///
/// Random residues are raised to `(modulus - 1) / degree`, which lands in the
/// subgroup of `degree`-th roots; a result whose half power is `-1` is
/// primitive. Returns `None` when `degree` does not divide `modulus - 1`, the
/// degree is invalid, or every attempt fails.
pub fn try_primitive_root_with_rng<R, P>(
    degree: u64,
    modulus: &Modulus,
    rng: &mut R,
    options: SearchOptions,
    pool: &P,
) -> Result<Option<Vec<u64>>, ArithError>
where
    R: RngCore + ?Sized,
    P: MemoryPool,
{
    ensure_prime_candidate(modulus)?;
    if !is_valid_degree(degree) {
        return Ok(None);
    }
    let options = options.normalize();
    let uint64_count = modulus.uint64_count();

    let mut group_size = allocate_uint(uint64_count, pool);
    decrement_uint_unchecked(modulus.value(), &mut group_size);
    let mut divisor = allocate_uint(uint64_count, pool);
    set_uint_unchecked(degree, &mut divisor);
    let mut exponent = allocate_uint(uint64_count, pool);
    divide_uint_uint_inplace_unchecked(&mut group_size, &divisor, &mut exponent, pool);
    if !is_zero_uint(&group_size) {
        debug!(degree, "degree does not divide the group order");
        return Ok(None);
    }

    let mut candidate = allocate_uint(uint64_count, pool);
    let mut root = vec![0; uint64_count];
    for attempt in 1..=options.max_attempts {
        for word in candidate.iter_mut() {
            *word = rng.next_u64();
        }
        modulo_uint_inplace(&mut candidate, modulus, pool);
        exponentiate_uint_mod_unchecked(&candidate, &exponent, modulus, &mut root, pool);
        if is_primitive_root_unchecked(&root, degree, modulus, pool) {
            debug!(degree, attempt, "found primitive root");
            return Ok(Some(root));
        }
    }
    debug!(degree, attempts = options.max_attempts, "no primitive root found");
    Ok(None)
}

/// The smallest primitive `degree`-th root of unity modulo a prime, using the
/// thread RNG for the initial search.
pub fn try_minimal_primitive_root<P: MemoryPool>(
    degree: u64,
    modulus: &Modulus,
    pool: &P,
) -> Result<Option<Vec<u64>>, ArithError> {
    try_minimal_primitive_root_with_rng(
        degree,
        modulus,
        &mut rand::rng(),
        SearchOptions::default(),
        pool,
    )
}

/// The smallest primitive `degree`-th root of unity modulo a prime.
///
/// The primitive roots are the odd powers of any one of them, so the scan
/// multiplies a found root by its square `degree` times and keeps the minimum.
pub fn try_minimal_primitive_root_with_rng<R, P>(
    degree: u64,
    modulus: &Modulus,
    rng: &mut R,
    options: SearchOptions,
    pool: &P,
) -> Result<Option<Vec<u64>>, ArithError>
where
    R: RngCore + ?Sized,
    P: MemoryPool,
{
    let Some(mut minimal) = try_primitive_root_with_rng(degree, modulus, rng, options, pool)?
    else {
        return Ok(None);
    };

    let uint64_count = modulus.uint64_count();
    let mut generator_sq = allocate_uint(uint64_count, pool);
    multiply_uint_uint_mod_unchecked(&minimal, &minimal, modulus, &mut generator_sq, pool);
    let mut generator = allocate_uint(uint64_count, pool);
    generator.copy_from_slice(&minimal);
    let mut next = allocate_uint(uint64_count, pool);

    for _ in 0..degree {
        if is_less_than_uint_uint(&generator, &minimal) {
            minimal.copy_from_slice(&generator);
        }
        multiply_uint_uint_mod_unchecked(&generator, &generator_sq, modulus, &mut next, pool);
        mem::swap(&mut generator, &mut next);
    }
    Ok(Some(minimal))
}
