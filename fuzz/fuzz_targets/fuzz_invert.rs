#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use num_integer::Integer;

use hemath_core::numth::try_invert_uint_mod;
use hemath_core::uint::{uint_from_biguint, uint_to_biguint};
use hemath_memory::MemoryPoolSt;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let half = data.len() / 2;
    let modulus = BigUint::from_bytes_le(&data[..half]);
    if modulus <= BigUint::from(1u32) {
        return;
    }
    let operand = BigUint::from_bytes_le(&data[half..]) % &modulus;
    let width = modulus.to_u64_digits().len();
    let modulus_words = uint_from_biguint(&modulus, width).unwrap();
    let operand_words = uint_from_biguint(&operand, width).unwrap();

    let pool = MemoryPoolSt::new();
    let inverse = try_invert_uint_mod(&operand_words, &modulus_words, &pool).unwrap();
    match inverse {
        Some(inverse) => {
            let inverse = uint_to_biguint(&inverse);
            assert!(inverse < modulus);
            assert_eq!((inverse * &operand) % &modulus, BigUint::from(1u32));
        }
        None => assert_ne!(operand.gcd(&modulus), BigUint::from(1u32)),
    }
});
