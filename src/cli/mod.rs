//! CLI module for ollama-client
//!
//! Handles command-line argument parsing for the bundled binary.

pub mod args;

pub use args::{into_options, parse_option, Args, Commands, Verbosity};
