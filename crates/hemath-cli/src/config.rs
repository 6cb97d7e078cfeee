//! Application configuration from CLI flags and environment.

use clap::{Parser, Subcommand, ValueEnum};

/// hemath: modular arithmetic and number theory on fixed-width integers.
#[derive(Parser, Debug)]
#[command(name = "hemath", version, about)]
pub struct AppConfig {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,

    /// Output format.
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        env = "HEMATH_FORMAT",
        global = true
    )]
    pub format: OutputFormat,

    /// Memory pool flavor used for scratch space.
    #[arg(
        long,
        value_enum,
        default_value_t = PoolKind::Local,
        env = "HEMATH_POOL",
        global = true
    )]
    pub pool: PoolKind,

    /// Include pool statistics in the report.
    #[arg(long, global = true)]
    pub stats: bool,

    /// Write the report to a file instead of stdout.
    #[arg(short, long, global = true)]
    pub output: Option<String>,
}

/// Subcommands. Numbers are decimal or `0x`-prefixed hexadecimal.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Describe a modulus and the reduction path it selects.
    Info {
        /// The modulus.
        modulus: String,
    },

    /// Divide by a modulus, printing quotient and remainder.
    Divide {
        /// The numerator.
        numerator: String,
        /// The modulus.
        modulus: String,
    },

    /// Multiply two residues modulo a modulus.
    Mulmod {
        /// First factor.
        a: String,
        /// Second factor.
        b: String,
        /// The modulus.
        modulus: String,
    },

    /// Raise a residue to a power modulo a modulus.
    Powmod {
        /// The base.
        base: String,
        /// The exponent.
        exponent: String,
        /// The modulus.
        modulus: String,
    },

    /// Invert a residue modulo a modulus.
    Invert {
        /// The value to invert.
        operand: String,
        /// The modulus.
        modulus: String,
    },

    /// Find a primitive root of unity modulo a prime.
    Root {
        /// Order of the root; a power of two of at least two.
        degree: u64,
        /// The prime modulus.
        modulus: String,

        /// Return the smallest primitive root of that order.
        #[arg(long)]
        minimal: bool,

        /// Seed for the candidate generator; the thread RNG is used if absent.
        #[arg(long, env = "HEMATH_SEED")]
        seed: Option<u64>,

        /// Random candidates to try before giving up.
        #[arg(long, default_value = "100")]
        attempts: usize,
    },
}

/// Report rendering.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `key: value` line per field.
    Text,
    /// A single JSON object.
    Json,
}

/// Which memory pool backs the computation.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    /// Single-threaded pool.
    Local,
    /// Thread-safe pool.
    Shared,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
