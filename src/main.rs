//! herakles-top - version 0.1.0
//!
//! Live per-process CPU and memory monitor with tracing logging.
//! This is the main entry point that starts the monitor loop and handles subcommands.

mod cli;
mod commands;
mod config;
mod startup_checks;

use clap::Parser;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tokio::signal;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};

use cli::{Args, Commands, OutputMode};
use commands::{command_check, command_config, command_test};
use config::{resolve_config, show_config, validate_effective_config, Config};
use herakles_top::{JsonRenderer, Monitor, PlainRenderer, Renderer, TerminalRenderer};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr, or to `log_file` without ANSI colors, so they never
/// end up inside the table on stdout.
fn setup_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let level = match config.log_level.as_deref().unwrap_or("warn") {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "info" => LevelFilter::INFO,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::WARN,
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = builder.with_writer(io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    debug!("Logging initialized with level: {}", level);
    Ok(())
}

/// Resolves and validates configuration, exiting with code 1 when invalid.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    Ok(config)
}

fn build_renderer(mode: OutputMode, config: &Config) -> Box<dyn Renderer> {
    match mode {
        OutputMode::Terminal => Box::new(TerminalRenderer::stdout(
            config.enable_color.unwrap_or(true),
        )),
        OutputMode::Plain => Box::new(PlainRenderer::new(io::stdout())),
        OutputMode::Json => Box::new(JsonRenderer::new(io::stdout())),
    }
}

/// Text printed to stderr when startup checks fail while logs and the
/// redrawn table share the terminal, since the first redraw clears log lines.
fn startup_notice(
    mode: OutputMode,
    config: &Config,
    err: &startup_checks::ValidationError,
) -> Option<String> {
    if mode != OutputMode::Terminal || config.log_file.is_some() {
        return None;
    }
    Some(format!(
        "⚠️  Startup validation failed: {}\n   Counters may stay empty. Later warnings are cleared by \
         the next redraw; use --log-file <PATH> to keep them.",
        err
    ))
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), stopping...");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        if let Commands::Config {
            output,
            format,
            commented,
        } = command
        {
            return command_config(output.clone(), format.clone(), *commented);
        }

        let config = resolve_config(&args)?;
        setup_logging(&config)?;

        return match command {
            Commands::Check => command_check(&config),
            Commands::Test {
                iterations,
                verbose,
            } => {
                if let Err(e) = validate_effective_config(&config) {
                    eprintln!("❌ Configuration invalid: {}", e);
                    std::process::exit(1);
                }
                Ok(command_test(*iterations, *verbose, &config)?)
            }
            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config)?;

    info!("Starting herakles-top");

    let proc_root = config.proc_root();
    if let Err(e) = startup_checks::validate_requirements(&proc_root) {
        error!("Startup validation failed: {}", e);
        error!("The monitor will start but may show empty counters");
        if let Some(notice) = startup_notice(args.output, &config, &e) {
            eprintln!("{}", notice);
        }
    }

    // Configure parallel processing
    if let Some(threads) = config.parallelism {
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|e| error!("Failed to set rayon thread pool: {}", e));
            debug!("Rayon thread pool configured with {} threads", threads);
        }
    }

    let renderer = build_renderer(args.output, &config);
    let mut monitor = Monitor::new(config.procfs_source(), renderer, config.monitor_settings());

    let frames = monitor.run(shutdown_signal(), args.iterations).await;

    info!("herakles-top stopped after {} frames", frames);
    Ok(())
}
