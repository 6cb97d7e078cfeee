#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

use hemath_core::reduce::divide_and_reduce;
use hemath_core::uint::uint_to_biguint;
use hemath_core::Modulus;
use hemath_memory::MemoryPoolSt;

fn words(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks the modulus width in words (1..=4)
    let modulus_words = usize::from(data[0] % 4) + 1;
    let rest = &data[1..];
    let split = (modulus_words * 8).min(rest.len());
    let modulus = words(&rest[..split]);
    let mut remainder = words(&rest[split..]);
    let Ok(modulus) = Modulus::new(&modulus) else {
        return;
    };
    if remainder.is_empty() {
        remainder.push(0);
    }

    let numerator = uint_to_biguint(&remainder);
    let mut quotient = vec![0u64; remainder.len()];
    let pool = MemoryPoolSt::new();
    divide_and_reduce(&mut remainder, &modulus, &mut quotient, &pool).unwrap();

    let divisor: BigUint = uint_to_biguint(modulus.value());
    assert_eq!(uint_to_biguint(&quotient), &numerator / &divisor);
    assert_eq!(uint_to_biguint(&remainder), &numerator % &divisor);
});
