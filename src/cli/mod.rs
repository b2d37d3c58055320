//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{CertArgs, Cli, Commands, ConfigAction, ConfigArgs, KeyArgs, LogFormat};
