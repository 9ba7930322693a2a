//! CLI command implementations for herakles-top.
//!
//! - `check`: procfs and configuration validation
//! - `config`: Configuration file generation
//! - `test`: Sampling cycle testing

pub mod check;
pub mod config;

pub use check::command_check;
pub use config::command_config;
pub use test::command_test;
