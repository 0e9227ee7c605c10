//! Command-line shell around the intake pipeline.

mod commands;
mod helpers;

pub use commands::{is_verbose, run};
