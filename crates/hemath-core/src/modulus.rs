//! Moduli with precomputed reduction data.
//!
//! A [`Modulus`] caches what the reduction routines dispatch on: whether the
//! value is `2^k - 1`, the negated inverse `2^b - value` when it is short
//! enough to fold with, and for small single-word values the Barrett ratio
//! `floor(2^128 / value)`.

use std::io::{self, Read, Write};

use crate::arith::negate_uint_inplace;
use crate::constants::{BARRETT_MAX_BIT_COUNT, FAST_MOD_THRESHOLD};
use crate::error::{ensure_nonempty, ArithError};
use crate::uint::{
    filter_highbits_uint_unchecked, get_power_of_two_minus_one_uint,
    get_significant_bit_count_uint, is_zero_uint,
};
use crate::word::{add_with_carry, mul_wide};

/// Failure to read or write a serialized [`Modulus`].
#[derive(Debug, thiserror::Error)]
pub enum ModulusError {
    /// The stored value is not a valid modulus.
    #[error(transparent)]
    Arith(#[from] ArithError),

    /// The underlying reader or writer failed.
    #[error("modulus i/o failed: {0}")]
    Io(#[from] io::Error),

    /// The stream does not describe a consistent modulus.
    #[error("corrupt modulus data: {0}")]
    Corrupt(String),
}

/// An immutable nonzero modulus of fixed word width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modulus {
    value: Vec<u64>,
    significant_bit_count: usize,
    power_of_two_minus_one: Option<usize>,
    inverse: Option<Vec<u64>>,
    const_ratio: [u64; 3],
}

impl Modulus {
    /// Build a modulus from its words; the word count fixes the operand width.
    pub fn new(value: &[u64]) -> Result<Self, ArithError> {
        ensure_nonempty("modulus", value.len())?;
        if is_zero_uint(value) {
            return Err(ArithError::ZeroModulus);
        }

        let significant_bit_count = get_significant_bit_count_uint(value);
        Ok(Self {
            value: value.to_vec(),
            significant_bit_count,
            power_of_two_minus_one: get_power_of_two_minus_one_uint(value),
            inverse: small_inverse(value, significant_bit_count),
            const_ratio: barrett_ratio(value, significant_bit_count),
        })
    }

    /// Build a single-word modulus.
    pub fn from_u64(value: u64) -> Result<Self, ArithError> {
        Self::new(&[value])
    }

    /// The modulus words.
    pub fn value(&self) -> &[u64] {
        &self.value
    }

    /// Bits needed to represent the modulus.
    pub fn significant_bit_count(&self) -> usize {
        self.significant_bit_count
    }

    /// Operand width in words.
    pub fn uint64_count(&self) -> usize {
        self.value.len()
    }

    /// `Some(k)` when the modulus is `2^k - 1`.
    pub fn power_of_two_minus_one(&self) -> Option<usize> {
        self.power_of_two_minus_one
    }

    /// The negated inverse `2^b - value` reduced to `b - 1` bits, present only
    /// when it is at least [`FAST_MOD_THRESHOLD`] bits shorter than that.
    pub fn inverse(&self) -> Option<&[u64]> {
        self.inverse.as_deref()
    }

    /// `floor(2^128 / value)` as two words followed by `2^128 mod value`;
    /// all zero when the modulus is not Barrett capable.
    pub fn const_ratio(&self) -> [u64; 3] {
        self.const_ratio
    }

    /// Whether the modulus is a single-word value in `[2, 2^62)`.
    pub fn is_barrett_capable(&self) -> bool {
        self.const_ratio != [0; 3]
    }

    /// Reduce a 128-bit value (`[low, high]`) modulo a Barrett-capable modulus.
    pub fn barrett_reduce_128(&self, input: [u64; 2]) -> Result<u64, ArithError> {
        if !self.is_barrett_capable() {
            return Err(ArithError::InvalidArgument(format!(
                "a {}-bit modulus has no Barrett ratio",
                self.significant_bit_count
            )));
        }
        Ok(self.barrett_reduce_128_unchecked(input))
    }

    /// Unchecked form of [`barrett_reduce_128`](Self::barrett_reduce_128).
    pub fn barrett_reduce_128_unchecked(&self, input: [u64; 2]) -> u64 {
        let modulus = self.value[0];
        let ratio = self.const_ratio;

        // round 1
        let (_, carry) = mul_wide(input[0], ratio[0]);
        let (low, high) = mul_wide(input[0], ratio[1]);
        let (tmp1, c) = add_with_carry(low, carry, 0);
        let tmp3 = high + c;

        // round 2
        let (low, high) = mul_wide(input[1], ratio[0]);
        let (_, c) = add_with_carry(tmp1, low, 0);
        let carry = high + c;

        // estimated quotient, good to within one
        let estimate = input[1]
            .wrapping_mul(ratio[1])
            .wrapping_add(tmp3)
            .wrapping_add(carry);
        let remainder = input[0].wrapping_sub(estimate.wrapping_mul(modulus));
        if remainder >= modulus {
            remainder - modulus
        } else {
            remainder
        }
    }

    /// Write the modulus in its little-endian wire format.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), ModulusError> {
        let bit_count = i32::try_from(self.significant_bit_count)
            .map_err(|_| ModulusError::Corrupt("bit count does not fit in i32".into()))?;
        let uint64_count = i32::try_from(self.value.len())
            .map_err(|_| ModulusError::Corrupt("word count does not fit in i32".into()))?;
        writer.write_all(&bit_count.to_le_bytes())?;
        writer.write_all(&uint64_count.to_le_bytes())?;
        for word in self.value.iter().chain(&self.const_ratio) {
            writer.write_all(&word.to_le_bytes())?;
        }
        Ok(())
    }

    /// Read a modulus written by [`save`](Self::save).
    ///
    /// Derived fields are recomputed; a header or ratio that disagrees with
    /// the value is reported as corrupt.
    pub fn load<R: Read>(reader: &mut R) -> Result<Self, ModulusError> {
        let bit_count = read_i32(reader)?;
        let uint64_count = read_i32(reader)?;
        let uint64_count = usize::try_from(uint64_count)
            .ok()
            .filter(|&count| count > 0)
            .ok_or_else(|| ModulusError::Corrupt(format!("invalid word count {uint64_count}")))?;

        let mut value = Vec::with_capacity(uint64_count.min(1 << 16));
        for _ in 0..uint64_count {
            value.push(read_u64(reader)?);
        }
        let mut stored_ratio = [0u64; 3];
        for word in &mut stored_ratio {
            *word = read_u64(reader)?;
        }

        let modulus = Self::new(&value)?;
        if usize::try_from(bit_count).ok() != Some(modulus.significant_bit_count) {
            return Err(ModulusError::Corrupt(format!(
                "header says {bit_count} bits but the value has {}",
                modulus.significant_bit_count
            )));
        }
        if stored_ratio != modulus.const_ratio {
            return Err(ModulusError::Corrupt("Barrett ratio does not match value".into()));
        }
        Ok(modulus)
    }
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

fn small_inverse(value: &[u64], significant_bit_count: usize) -> Option<Vec<u64>> {
    // 2^b - value fits in b - 1 bits, and is 0 mod value when value is 2^(b-1)
    let bit_count = significant_bit_count - 1;
    let mut inverse = value.to_vec();
    negate_uint_inplace(&mut inverse);
    filter_highbits_uint_unchecked(&mut inverse, bit_count);
    let inverse_bits = get_significant_bit_count_uint(&inverse);
    (bit_count - inverse_bits >= FAST_MOD_THRESHOLD).then_some(inverse)
}

#[allow(clippy::cast_possible_truncation)]
fn barrett_ratio(value: &[u64], significant_bit_count: usize) -> [u64; 3] {
    if !(2..=BARRETT_MAX_BIT_COUNT).contains(&significant_bit_count) {
        return [0; 3];
    }
    let v = u128::from(value[0]);
    // 2^128 = q * v + r, from 2^128 - 1 = q' * v + r'
    let mut quotient = u128::MAX / v;
    let mut remainder = u128::MAX % v + 1;
    if remainder == v {
        quotient += 1;
        remainder = 0;
    }
    [quotient as u64, (quotient >> 64) as u64, remainder as u64]
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn rejects_zero_and_empty() {
        assert_eq!(
            Modulus::new(&[]),
            Err(ArithError::InvalidArgument("modulus cannot be empty".into()))
        );
        assert_eq!(Modulus::new(&[0, 0]), Err(ArithError::ZeroModulus));
    }

    #[test]
    fn power_of_two_minus_one_detected() {
        let m = Modulus::from_u64(31).unwrap();
        assert_eq!(m.power_of_two_minus_one(), Some(5));
        assert_eq!(m.significant_bit_count(), 5);
        let m = Modulus::new(&[u64::MAX, 1]).unwrap();
        assert_eq!(m.power_of_two_minus_one(), Some(65));
        assert_eq!(Modulus::from_u64(30).unwrap().power_of_two_minus_one(), None);
    }

    #[test]
    fn small_inverse_present_for_near_power_of_two() {
        // 2^64 - 2^32 + 1 style: 0xFFFF_FFFF_0000_0001 has inverse 2^32 - 1 in 63 bits
        let m = Modulus::from_u64(0xFFFF_FFFF_0000_0001).unwrap();
        assert_eq!(m.inverse(), Some(&[0xFFFF_FFFF][..]));

        // 2^60 - 93
        let m = Modulus::from_u64((1 << 60) - 93).unwrap();
        assert_eq!(m.inverse(), Some(&[93][..]));
    }

    #[test]
    fn small_inverse_absent_for_dense_values() {
        assert_eq!(Modulus::from_u64(0b1011_0001).unwrap().inverse(), None);
        assert_eq!(Modulus::from_u64(1).unwrap().inverse(), None);
        assert_eq!(Modulus::from_u64(1_351_315_121).unwrap().inverse(), None);
    }

    #[test]
    fn power_of_two_has_zero_inverse() {
        let m = Modulus::from_u64(1 << 40).unwrap();
        assert_eq!(m.inverse(), Some(&[0][..]));
    }

    #[test]
    fn multiword_inverse() {
        // 2^100 - 5 over two words
        let m = Modulus::new(&[u64::MAX - 4, (1 << 36) - 1]).unwrap();
        assert_eq!(m.significant_bit_count(), 100);
        assert_eq!(m.inverse(), Some(&[5, 0][..]));
    }

    #[test]
    fn barrett_ratio_values() {
        let m = Modulus::from_u64(3).unwrap();
        assert!(m.is_barrett_capable());
        // 2^128 = 3 * 0x5555...5555 + 1
        assert_eq!(m.const_ratio(), [0x5555_5555_5555_5555, 0x5555_5555_5555_5555, 1]);

        let m = Modulus::from_u64(1 << 20).unwrap();
        assert_eq!(m.const_ratio(), [0, 1 << 44, 0]);

        assert!(!Modulus::from_u64(1).unwrap().is_barrett_capable());
        assert!(!Modulus::from_u64(1 << 62).unwrap().is_barrett_capable());
        assert!(Modulus::from_u64((1 << 62) - 1).unwrap().is_barrett_capable());
        assert!(!Modulus::new(&[5, 1]).unwrap().is_barrett_capable());
    }

    #[test]
    fn barrett_reduction_matches_remainder() {
        let moduli = [2u64, 3, 7, 0xFFFF_FFFF, 1_351_315_121, (1 << 62) - 57];
        let inputs = [
            0u128,
            1,
            u128::from(u64::MAX),
            u128::MAX,
            0x1234_5678_9ABC_DEF0_0FED_CBA9_8765_4321,
        ];
        for &value in &moduli {
            let m = Modulus::from_u64(value).unwrap();
            for &x in &inputs {
                let words = [x as u64, (x >> 64) as u64];
                let expected = (x % u128::from(value)) as u64;
                assert_eq!(m.barrett_reduce_128(words).unwrap(), expected, "{x} mod {value}");
            }
        }
    }

    #[test]
    fn barrett_rejected_without_ratio() {
        let m = Modulus::new(&[1, 1]).unwrap();
        assert!(m.barrett_reduce_128([5, 0]).is_err());
    }

    #[test]
    fn save_load_round_trip() {
        for words in [&[17u64][..], &[u64::MAX, 3][..], &[0xFFFF_FFFF_0000_0001][..]] {
            let m = Modulus::new(words).unwrap();
            let mut bytes = Vec::new();
            m.save(&mut bytes).unwrap();
            assert_eq!(bytes.len(), 8 + 8 * words.len() + 24);
            let loaded = Modulus::load(&mut Cursor::new(bytes)).unwrap();
            assert_eq!(loaded, m);
        }
    }

    #[test]
    fn wire_format_layout() {
        let m = Modulus::from_u64(3).unwrap();
        let mut bytes = Vec::new();
        m.save(&mut bytes).unwrap();
        assert_eq!(&bytes[0..4], &2i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1i32.to_le_bytes());
        assert_eq!(&bytes[8..16], &3u64.to_le_bytes());
        assert_eq!(&bytes[32..40], &1u64.to_le_bytes());
    }

    #[test]
    fn load_rejects_inconsistent_header() {
        let m = Modulus::from_u64(17).unwrap();
        let mut bytes = Vec::new();
        m.save(&mut bytes).unwrap();
        bytes[0] = 9;
        assert!(matches!(
            Modulus::load(&mut Cursor::new(bytes)),
            Err(ModulusError::Corrupt(_))
        ));
    }

    #[test]
    fn load_rejects_bad_word_count_and_ratio() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&5i32.to_le_bytes());
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            Modulus::load(&mut Cursor::new(bytes)),
            Err(ModulusError::Corrupt(_))
        ));

        let m = Modulus::from_u64(17).unwrap();
        let mut bytes = Vec::new();
        m.save(&mut bytes).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 1;
        assert!(matches!(
            Modulus::load(&mut Cursor::new(bytes)),
            Err(ModulusError::Corrupt(_))
        ));
    }

    #[test]
    fn load_reports_truncation_and_zero() {
        let m = Modulus::from_u64(17).unwrap();
        let mut bytes = Vec::new();
        m.save(&mut bytes).unwrap();
        bytes.truncate(12);
        assert!(matches!(
            Modulus::load(&mut Cursor::new(bytes)),
            Err(ModulusError::Io(_))
        ));

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            Modulus::load(&mut Cursor::new(bytes)),
            Err(ModulusError::Arith(ArithError::ZeroModulus))
        ));
    }
}
