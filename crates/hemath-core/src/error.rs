//! Errors reported by the checked arithmetic entry points.

/// A violated precondition of an arithmetic routine.
///
/// Domain failures such as a missing inverse are not errors; they are
/// reported through `Option` or `bool` results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    /// A buffer does not have the word count the operation requires.
    #[error("{name} has {actual} words, expected {expected}")]
    LengthMismatch {
        /// Which argument was wrong.
        name: &'static str,
        /// Required word count.
        expected: usize,
        /// Word count supplied.
        actual: usize,
    },

    /// A shift amount larger than the operand width.
    #[error("shift amount {amount} exceeds operand width of {width} bits")]
    ShiftOutOfRange {
        /// Requested shift in bits.
        amount: usize,
        /// Operand width in bits.
        width: usize,
    },

    /// A bit index at or past the operand width.
    #[error("bit index {index} out of range for a {width}-bit operand")]
    BitIndexOutOfRange {
        /// Requested bit.
        index: usize,
        /// Operand width in bits.
        width: usize,
    },

    /// Division by a zero denominator.
    #[error("division by zero")]
    ZeroDivisor,

    /// A modulus that is empty or zero.
    #[error("modulus cannot be zero")]
    ZeroModulus,

    /// An operand that must be below the modulus is not.
    #[error("{0} is not reduced modulo the modulus")]
    NotReduced(&'static str),

    /// An operation that needs an odd modulus was given an even one.
    #[error("modulus must be odd")]
    EvenModulus,

    /// A modulus with fewer significant bits than the operation needs.
    #[error("modulus must have at least {0} significant bits")]
    ModulusTooSmall(usize),

    /// Any other invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub(crate) fn ensure_len(
    name: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ArithError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ArithError::LengthMismatch {
            name,
            expected,
            actual,
        })
    }
}

pub(crate) fn ensure_nonempty(name: &'static str, actual: usize) -> Result<(), ArithError> {
    if actual == 0 {
        Err(ArithError::InvalidArgument(format!("{name} cannot be empty")))
    } else {
        Ok(())
    }
}
