//! Logging infrastructure using tracing + tracing-subscriber
//!
//! Features:
//! - Console output on stderr (stdout stays free for command output)
//! - Optional file logging with daily rotation
//! - JSON format option
//! - Per-module log levels via RUST_LOG

use std::fs;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

/// Guards that must be held for the lifetime of the application
/// to ensure logs are flushed properly
pub struct LogGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system
///
/// Returns guards that must be kept alive for the duration of the program.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = determine_level(settings, verbose, quiet);
    let env_filter = build_env_filter(level)?;
    let console_layer = build_console_layer(settings.json_format);

    let (file_layer, file_guard) = match settings.file {
        Some(ref log_file) => {
            let (layer, guard) = build_file_layer(log_file, settings.max_files, settings.json_format)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(
        level = %level,
        file = ?settings.file,
        json = settings.json_format,
        "Logging initialized"
    );

    Ok(LogGuards {
        _file_guard: file_guard,
    })
}

/// Determine the effective log level based on settings and CLI flags
fn determine_level(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => parse_level(&settings.level),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Parse a log level string
fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the environment filter with support for RUST_LOG
fn build_env_filter(cli_level: Level) -> Result<EnvFilter> {
    let base_filter = cli_level.to_string().to_lowercase();

    let directive = |s: &str| -> Result<Directive> {
        s.parse()
            .map_err(|e| Error::Internal(format!("Invalid log directive '{}': {}", s, e)))
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&base_filter))
        .add_directive(directive(&format!("persona_bootloader={}", base_filter))?)
        // Reduce noise from dependencies
        .add_directive(directive("hyper=warn")?)
        .add_directive(directive("reqwest=warn")?)
        .add_directive(directive("rustls=warn")?);

    Ok(filter)
}

/// Build the console output layer
fn build_console_layer<S>(json_format: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    if json_format {
        Box::new(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
    } else {
        Box::new(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(true)
                .compact(),
        )
    }
}

/// Build the file logging layer with rotation
fn build_file_layer<S>(
    log_file: &str,
    max_files: u32,
    json_format: bool,
) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let path = Path::new(log_file);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_write(parent, e))?;
    }

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("bootloader.log");

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .filename_suffix("log")
        .max_log_files(max_files.max(1) as usize)
        .build(directory)
        .map_err(|e| Error::Internal(format!("Failed to create log file appender: {}", e)))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let layer: Box<dyn Layer<S> + Send + Sync> = if json_format {
        Box::new(
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false),
        )
    } else {
        Box::new(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false),
        )
    };

    Ok((layer, guard))
}
