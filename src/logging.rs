//! Tracing initialization.
//!
//! Console output always; an optional non-blocking rolling file appender
//! on top when `logging.enable_file_logging` is set. Room handlers tag
//! their events with `code`, `player_id` and `phase` fields, so the JSON
//! format is the one to pick when logs are shipped somewhere structured.

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{LogFormat, LoggingConfig};

/// Directives applied when neither the config nor `RUST_LOG` says
/// otherwise: game and room lifecycle at info, the HTTP plumbing under
/// the WebSocket endpoint only when something is wrong.
const DEFAULT_DIRECTIVES: &str = "info,tower_http=warn,hyper=warn";

/// Install the global subscriber. Called once at startup; failures to
/// set up the file appender degrade to console-only logging rather than
/// aborting the server.
pub fn init_with_config(cfg: &LoggingConfig) {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(render_layer(cfg.format, None));

    if cfg.enable_file_logging {
        match rolling_writer(cfg) {
            Ok(writer) => layers.push(render_layer(cfg.format, Some(writer))),
            Err(err) => {
                eprintln!(
                    "File logging disabled ({err}); room events go to stdout only"
                );
            }
        }
    }

    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(log_filter(cfg))
        .try_init();
}

/// Filter precedence: config level > `RUST_LOG` > built-in directives.
fn log_filter(cfg: &LoggingConfig) -> EnvFilter {
    if let Some(level) = &cfg.level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
    }
}

/// One rendering layer, console or file. File output never uses ANSI
/// colors; console text output does.
fn render_layer(
    format: LogFormat,
    file: Option<NonBlocking>,
) -> Box<dyn Layer<Registry> + Send + Sync> {
    let base = tracing_subscriber::fmt::layer().with_timer(UtcTime::rfc_3339());
    match (format, file) {
        (LogFormat::Json, Some(writer)) => {
            base.json().with_ansi(false).with_writer(writer).boxed()
        }
        (LogFormat::Json, None) => base
            .json()
            .with_ansi(false)
            .with_writer(std::io::stdout)
            .boxed(),
        (LogFormat::Text, Some(writer)) => base.with_ansi(false).with_writer(writer).boxed(),
        (LogFormat::Text, None) => base.with_ansi(true).with_writer(std::io::stdout).boxed(),
    }
}

/// Build the non-blocking rolling appender for the configured directory,
/// rotation and filename.
fn rolling_writer(cfg: &LoggingConfig) -> Result<NonBlocking, std::io::Error> {
    std::fs::create_dir_all(&cfg.dir)?;

    let rotation = match cfg.rotation.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    };
    let appender = RollingFileAppender::new(rotation, &cfg.dir, &cfg.filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // The guard flushes buffered lines on drop; the process keeps it for
    // its whole lifetime.
    let _leaked: &'static _ = Box::leak(Box::new(guard));

    Ok(writer)
}
