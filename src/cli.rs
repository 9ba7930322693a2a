//! CLI arguments and subcommands for herakles-top.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Where and how frames are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Redraw the screen in place
    Terminal,
    /// Append plain-text frames (batch mode)
    Plain,
    /// One JSON document per frame and line
    Json,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-top",
    about = "Live per-process CPU and memory monitor for Linux",
    long_about = "Live per-process CPU and memory monitor for Linux.\n\n\
                  Samples /proc counters on a fixed interval, derives CPU and memory \
                  percentages from successive snapshots and shows the busiest processes.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true,
    after_help = "Project: https://github.com/cansp-dev/herakles-top - More info: https://www.herakles.now"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Refresh interval in seconds (same as --interval)
    #[arg(value_name = "INTERVAL", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_pos: Option<u64>,

    /// Refresh interval in seconds
    #[arg(short = 'i', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Number of processes to show
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Stop after this many frames
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Output mode
    #[arg(short = 'o', long, value_enum, default_value = "terminal")]
    pub output: OutputMode,

    /// Log level [default: warn]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// procfs mount point
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Include only processes matching these names (comma-separated)
    #[arg(long)]
    pub include_names: Option<String>,

    /// Exclude processes matching these names (comma-separated)
    #[arg(long)]
    pub exclude_names: Option<String>,

    /// Maximum number of processes to scan
    #[arg(long)]
    pub max_processes: Option<usize>,

    /// Parallel read threads (0 = auto, 1 = sequential)
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write logs to this file instead of stderr (in terminal mode the
    /// redraw clears log lines written to the same tty)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Interval from `--interval`, else from the positional argument.
    pub fn refresh_seconds(&self) -> Option<u64> {
        self.interval.or(self.interval_pos)
    }
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and /proc access
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Test counter collection
    Test {
        /// Number of test iterations
        #[arg(short = 'n', long, default_value_t = 2)]
        iterations: usize,

        /// Show the ranked processes of every iteration
        #[arg(long)]
        verbose: bool,
    },
}
