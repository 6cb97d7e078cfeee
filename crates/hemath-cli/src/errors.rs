//! Error handling and exit codes.

use hemath_core::constants::exit_codes;
use hemath_core::{ArithError, ModulusError};

/// Failures surfaced by the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// An argument is not a valid number.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// The operation has no answer for these inputs.
    #[error("{0}")]
    NoSolution(String),
}

/// Map an application error to its exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<CliError>() {
        return match err {
            CliError::InvalidNumber(_) => exit_codes::ERROR_CONFIG,
            CliError::NoSolution(_) => exit_codes::ERROR_DOMAIN,
        };
    }
    if err.downcast_ref::<ArithError>().is_some() {
        return exit_codes::ERROR_CONFIG;
    }
    if let Some(ModulusError::Arith(_)) = err.downcast_ref::<ModulusError>() {
        return exit_codes::ERROR_CONFIG;
    }
    exit_codes::ERROR_GENERIC
}
