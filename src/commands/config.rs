//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from(default_file_name(&format)),
    };

    let mut content = render_config(&config, &format)?;
    if commented {
        if let ConfigFormat::Yaml = format {
            content = add_config_comments(content);
        }
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

fn default_file_name(format: &ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Yaml => "herakles-top.yaml",
        ConfigFormat::Json => "herakles-top.json",
        ConfigFormat::Toml => "herakles-top.toml",
    }
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# herakles-top Configuration
# ==========================
#
# Sampling
# --------
# refresh_seconds: 2           # Seconds between frames (minimum 1)
# top_n: 10                    # Number of processes shown
# proc_root: "/proc"           # procfs mount point
#
# Process Selection
# -----------------
# include_names: null          # Show only processes whose name contains one of these
# exclude_names: null          # Hide processes whose name contains one of these
# max_processes: null          # Maximum processes to scan (lowest PIDs first)
#
# Performance Tuning
# ------------------
# parallelism: null            # Read threads (null/0 = auto, 1 = sequential)
#
# Output
# ------
# enable_color: true           # Color the header and CPU column
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace
# log_file: null               # Log file path (null = stderr)
"#;

    format!("{comments}\n{yaml}")
}
