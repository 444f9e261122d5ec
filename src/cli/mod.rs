//! CLI module for bmi-advisor
//!
//! Handles command-line argument parsing and configuration management.

pub mod args;
pub mod config;

pub use args::{Args, Commands, OutputFormat, Verbosity};
pub use config::Config;
