//! Criterion benchmarks for multiplication, reduction and inversion.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use hemath_core::modarith::multiply_uint_uint_mod;
use hemath_core::multiply::multiply_uint_uint;
use hemath_core::numth::try_invert_uint_mod;
use hemath_core::reduce::modulo_uint_inplace;
use hemath_core::Modulus;
use hemath_memory::MemoryPoolSt;

fn pseudo_words(count: usize, seed: u64) -> Vec<u64> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            state
        })
        .collect()
}

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_uint_uint");
    for &count in &[1usize, 2, 4, 8] {
        let a = pseudo_words(count, 1);
        let b = pseudo_words(count, 2);
        let mut result = vec![0u64; 2 * count];
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |bench, _| {
            bench.iter(|| multiply_uint_uint(&a, &b, &mut result));
        });
    }
    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let pool = MemoryPoolSt::new();
    let moduli = [
        ("mersenne127", Modulus::new(&[u64::MAX, u64::MAX >> 1]).unwrap()),
        ("small_inverse", Modulus::new(&[u64::MAX - 158, u64::MAX >> 4]).unwrap()),
        ("generic", Modulus::new(&[0x1234_5678_9ABC_DEF1, 0x8000_0000_0000_0000]).unwrap()),
    ];
    let value = pseudo_words(4, 3);

    let mut group = c.benchmark_group("modulo_uint_inplace");
    for (name, modulus) in &moduli {
        group.bench_function(*name, |bench| {
            bench.iter(|| {
                let mut scratch = value.clone();
                modulo_uint_inplace(&mut scratch, modulus, &pool);
                scratch
            });
        });
    }
    group.finish();
}

fn bench_multiply_mod(c: &mut Criterion) {
    let pool = MemoryPoolSt::new();
    let barrett = Modulus::from_u64((1 << 61) - 1).unwrap();
    let wide = Modulus::from_u64(u64::MAX - 58).unwrap();
    let mut result = [0u64];

    let mut group = c.benchmark_group("multiply_uint_uint_mod");
    group.bench_function("barrett", |bench| {
        bench.iter(|| {
            multiply_uint_uint_mod(&[123_456_789], &[987_654_321], &barrett, &mut result, &pool)
        });
    });
    group.bench_function("fold", |bench| {
        bench.iter(|| {
            multiply_uint_uint_mod(&[u64::MAX - 60], &[u64::MAX - 61], &wide, &mut result, &pool)
        });
    });
    group.finish();
}

fn bench_invert(c: &mut Criterion) {
    let pool = MemoryPoolSt::new();
    c.bench_function("try_invert_uint_mod", |bench| {
        bench.iter(|| try_invert_uint_mod(&[331_975_426], &[1_351_315_121], &pool));
    });
}

criterion_group!(benches, bench_multiply, bench_reduce, bench_multiply_mod, bench_invert);
criterion_main!(benches);
