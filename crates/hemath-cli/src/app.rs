//! Application entry point and dispatch.

use anyhow::Result;
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use hemath_core::modarith::{exponentiate_uint_mod, multiply_uint_uint_mod};
use hemath_core::numth::{
    try_invert_uint_mod, try_minimal_primitive_root_with_rng, try_primitive_root_with_rng,
};
use hemath_core::reduce::divide_and_reduce;
use hemath_core::uint::{get_power_of_two_uint, uint_from_biguint, uint_to_biguint};
use hemath_core::{Modulus, SearchOptions};
use hemath_memory::{MemoryPool, MemoryPoolMt, MemoryPoolSt};

use crate::config::{AppConfig, Command, PoolKind};
use crate::errors::CliError;
use crate::output::{write_to_file, Report};

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    let report = match config.pool {
        PoolKind::Local => execute(&config.command, &MemoryPoolSt::new(), config.stats)?,
        PoolKind::Shared => execute(&config.command, &MemoryPoolMt::new(), config.stats)?,
    };
    let rendered = report.render(config.format)?;
    match &config.output {
        Some(path) => write_to_file(path, &rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Run one command against `pool` and collect its report.
pub fn execute<P: MemoryPool>(command: &Command, pool: &P, stats: bool) -> Result<Report> {
    debug!(?command, "executing");
    let mut report = match command {
        Command::Info { modulus } => info(modulus)?,
        Command::Divide { numerator, modulus } => divide(numerator, modulus, pool)?,
        Command::Mulmod { a, b, modulus } => mulmod(a, b, modulus, pool)?,
        Command::Powmod {
            base,
            exponent,
            modulus,
        } => powmod(base, exponent, modulus, pool)?,
        Command::Invert { operand, modulus } => invert(operand, modulus, pool)?,
        Command::Root {
            degree,
            modulus,
            minimal,
            seed,
            attempts,
        } => root(*degree, modulus, *minimal, *seed, *attempts, pool)?,
    };
    if stats {
        report.pool = Some(pool.stats());
    }
    Ok(report)
}

/// Parse a decimal or `0x`-prefixed hexadecimal number.
pub fn parse_number(text: &str) -> Result<BigUint, CliError> {
    let trimmed = text.trim();
    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    };
    BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| CliError::InvalidNumber(text.to_string()))
}

fn word_count(value: &BigUint) -> usize {
    value.to_u64_digits().len().max(1)
}

fn parse_words(text: &str) -> Result<Vec<u64>> {
    let value = parse_number(text)?;
    Ok(uint_from_biguint(&value, word_count(&value))?)
}

fn parse_modulus(text: &str) -> Result<Modulus> {
    Ok(Modulus::new(&parse_words(text)?)?)
}

fn parse_residue(text: &str, modulus: &Modulus) -> Result<Vec<u64>> {
    let value = parse_number(text)?;
    Ok(uint_from_biguint(&value, modulus.uint64_count())?)
}

fn decimal(words: &[u64]) -> String {
    uint_to_biguint(words).to_string()
}

fn info(modulus_text: &str) -> Result<Report> {
    let modulus = parse_modulus(modulus_text)?;
    let reduction = if get_power_of_two_uint(modulus.value()).is_some() {
        "power-of-two"
    } else {
        match (modulus.power_of_two_minus_one(), modulus.inverse()) {
            (Some(k), _) if k >= 2 => "power-of-two-minus-one",
            (_, Some(_)) => "small-inverse",
            _ => "long-division",
        }
    };
    let mut wire = Vec::new();
    modulus.save(&mut wire)?;
    let wire_hex: String = wire.iter().map(|byte| format!("{byte:02x}")).collect();

    let mut report = Report::new("info")
        .with("value", decimal(modulus.value()))
        .with("bits", modulus.significant_bit_count())
        .with("words", modulus.uint64_count())
        .with("reduction", reduction)
        .with("barrett", modulus.is_barrett_capable())
        .with("wire", wire_hex);
    if let Some(k) = modulus.power_of_two_minus_one() {
        report = report.with("power_of_two_minus_one", k);
    }
    Ok(report)
}

fn divide<P: MemoryPool>(numerator_text: &str, modulus_text: &str, pool: &P) -> Result<Report> {
    let modulus = parse_modulus(modulus_text)?;
    let mut remainder = parse_words(numerator_text)?;
    let mut quotient = vec![0; remainder.len()];
    divide_and_reduce(&mut remainder, &modulus, &mut quotient, pool)?;
    Ok(Report::new("divide")
        .with("quotient", decimal(&quotient))
        .with("remainder", decimal(&remainder)))
}

fn mulmod<P: MemoryPool>(a: &str, b: &str, modulus_text: &str, pool: &P) -> Result<Report> {
    let modulus = parse_modulus(modulus_text)?;
    let a = parse_residue(a, &modulus)?;
    let b = parse_residue(b, &modulus)?;
    let mut product = vec![0; modulus.uint64_count()];
    multiply_uint_uint_mod(&a, &b, &modulus, &mut product, pool)?;
    Ok(Report::new("mulmod").with("product", decimal(&product)))
}

fn powmod<P: MemoryPool>(
    base: &str,
    exponent: &str,
    modulus_text: &str,
    pool: &P,
) -> Result<Report> {
    let modulus = parse_modulus(modulus_text)?;
    let base = parse_residue(base, &modulus)?;
    let exponent = parse_words(exponent)?;
    let mut power = vec![0; modulus.uint64_count()];
    exponentiate_uint_mod(&base, &exponent, &modulus, &mut power, pool)?;
    Ok(Report::new("powmod").with("power", decimal(&power)))
}

fn invert<P: MemoryPool>(operand_text: &str, modulus_text: &str, pool: &P) -> Result<Report> {
    let modulus = parse_modulus(modulus_text)?;
    let operand = parse_residue(operand_text, &modulus)?;
    match try_invert_uint_mod(&operand, modulus.value(), pool)? {
        Some(inverse) => Ok(Report::new("invert").with("inverse", decimal(&inverse))),
        None => Err(CliError::NoSolution(format!(
            "{} has no inverse modulo {}",
            decimal(&operand),
            decimal(modulus.value())
        ))
        .into()),
    }
}

fn root<P: MemoryPool>(
    degree: u64,
    modulus_text: &str,
    minimal: bool,
    seed: Option<u64>,
    attempts: usize,
    pool: &P,
) -> Result<Report> {
    let modulus = parse_modulus(modulus_text)?;
    let options = SearchOptions {
        max_attempts: attempts,
    }
    .normalize();
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let found = if minimal {
        try_minimal_primitive_root_with_rng(degree, &modulus, &mut *rng, options, pool)?
    } else {
        try_primitive_root_with_rng(degree, &modulus, &mut *rng, options, pool)?
    };
    match found {
        Some(root) => Ok(Report::new("root")
            .with("degree", degree)
            .with("root", decimal(&root))),
        None => Err(CliError::NoSolution(format!(
            "no primitive root of degree {degree} found modulo {}",
            decimal(modulus.value())
        ))
        .into()),
    }
}
