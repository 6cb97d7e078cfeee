//! hemath command-line front end: argument parsing, dispatch and reports.

pub mod app;
pub mod config;
pub mod errors;
pub mod output;
