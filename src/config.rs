//! Configuration management for herakles-top.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use herakles_top::monitor::{
    MonitorSettings, DEFAULT_REFRESH_SECONDS, DEFAULT_TOP_N, MIN_REFRESH_SECONDS,
};
use herakles_top::process::ProcessFilter;
use herakles_top::source::{ProcfsSource, DEFAULT_PROC_ROOT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::cli::{Args, ConfigFormat};

/// Config file locations tried when no `--config` is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 6] = [
    "/etc/herakles/top.yaml",
    "/etc/herakles/top.yml",
    "./herakles-top.yaml",
    "./herakles-top.yml",
    "./herakles-top.json",
    "./herakles-top.toml",
];

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Sampling
    #[serde(alias = "refresh-seconds")]
    pub refresh_seconds: Option<u64>,
    #[serde(alias = "top-n")]
    pub top_n: Option<usize>,
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    // Process selection
    #[serde(alias = "include-names")]
    pub include_names: Option<Vec<String>>,
    #[serde(alias = "exclude-names")]
    pub exclude_names: Option<Vec<String>>,
    #[serde(alias = "max-processes")]
    pub max_processes: Option<usize>,

    // Performance tuning
    pub parallelism: Option<usize>,

    // Output
    #[serde(alias = "enable-color")]
    pub enable_color: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
    #[serde(alias = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_seconds: Some(DEFAULT_REFRESH_SECONDS),
            top_n: Some(DEFAULT_TOP_N),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            include_names: None,
            exclude_names: None,
            max_processes: None,
            parallelism: None,
            enable_color: Some(true),
            log_level: Some("warn".into()),
            log_file: None,
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        let secs = self
            .refresh_seconds
            .unwrap_or(DEFAULT_REFRESH_SECONDS)
            .max(MIN_REFRESH_SECONDS);
        Duration::from_secs(secs)
    }

    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    pub fn process_filter(&self) -> ProcessFilter {
        ProcessFilter {
            include_names: self.include_names.clone(),
            exclude_names: self.exclude_names.clone(),
        }
    }

    /// Builds the procfs counter source described by this config.
    pub fn procfs_source(&self) -> ProcfsSource {
        ProcfsSource::new(self.proc_root())
            .with_filter(self.process_filter())
            .with_max_processes(self.max_processes)
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            refresh: self.refresh_interval(),
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
            parallel: self.parallelism != Some(1),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(secs) = cfg.refresh_seconds {
        if secs < MIN_REFRESH_SECONDS {
            return Err(format!(
                "refresh_seconds must be at least {}, got {}",
                MIN_REFRESH_SECONDS, secs
            )
            .into());
        }
    }

    if cfg.top_n == Some(0) {
        return Err("top_n must be at least 1".into());
    }

    if cfg.max_processes == Some(0) {
        return Err("max_processes must be at least 1 when set".into());
    }

    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(format!(
                    "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                    other
                )
                .into());
            }
        }
    }

    let root = cfg.proc_root();
    if !root.is_dir() {
        return Err(format!("proc_root is not a directory: {}", root.display()).into());
    }

    Ok(())
}

/// Splits a comma-separated CLI list, dropping empty items.
fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(secs) = args.refresh_seconds() {
        config.refresh_seconds = Some(secs);
    }
    if let Some(n) = args.top_n {
        config.top_n = Some(n);
    }
    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }

    // Parse comma-separated include/exclude names
    if let Some(include_str) = &args.include_names {
        config.include_names = Some(split_names(include_str));
    }
    if let Some(exclude_str) = &args.exclude_names {
        config.exclude_names = Some(split_names(exclude_str));
    }

    if let Some(max) = args.max_processes {
        config.max_processes = Some(max);
    }
    if let Some(threads) = args.parallelism {
        config.parallelism = Some(threads);
    }

    if let Some(level) = &args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }
    if args.no_color {
        config.enable_color = Some(false);
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }

    Ok(config)
}

/// Enhanced configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config file content, choosing the format from the file extension.
/// Keys missing from the file keep their default values.
pub fn parse_config(content: &str, path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let partial: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        // Default to YAML
        _ => serde_yaml::from_str(content)?,
    };
    Ok(merge_with_defaults(partial))
}

fn merge_with_defaults(partial: Config) -> Config {
    let d = Config::default();
    Config {
        refresh_seconds: partial.refresh_seconds.or(d.refresh_seconds),
        top_n: partial.top_n.or(d.top_n),
        proc_root: partial.proc_root.or(d.proc_root),
        include_names: partial.include_names.or(d.include_names),
        exclude_names: partial.exclude_names.or(d.exclude_names),
        max_processes: partial.max_processes.or(d.max_processes),
        parallelism: partial.parallelism.or(d.parallelism),
        enable_color: partial.enable_color.or(d.enable_color),
        log_level: partial.log_level.or(d.log_level),
        log_file: partial.log_file.or(d.log_file),
    }
}

/// Renders a configuration in the requested format
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}
