use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Level used when neither `-v` nor `RUST_LOG` say otherwise, e.g. `LOG_LEVEL=DEBUG`
const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub fn init_logging(verbose_level: u8, quiet: bool) -> Result<()> {
    init_logging_with_file(verbose_level, quiet, None)
}

/// Log to stderr, and also to `log_file` when one is given
pub fn init_logging_with_file(verbose_level: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = build_filter(verbose_level, quiet);

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal());

    let mut layers: Vec<BoxedLayer> = vec![stderr_layer(json)];

    if let Some(log_path) = log_file {
        let log_dir = log_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
        std::fs::create_dir_all(log_dir)?;
        let log_filename = log_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

        // One file per session, named by the caller
        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let file_layer = if json {
            fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender)
                .boxed()
        } else {
            fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender)
                .boxed()
        };
        layers.push(file_layer);
    }

    Registry::default().with(layers).with(filter).try_init()?;

    Ok(())
}

fn stderr_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr)
            .boxed()
    }
}

// 0 = info, 1 = debug (hyper connection noise suppressed), 2+ = trace
fn build_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    let fallback = match verbose_level {
        0 => level_from_env().unwrap_or_else(|| "info".to_string()),
        1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn".to_string(),
        _ => "trace".to_string(),
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn level_from_env() -> Option<String> {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .map(|level| level.trim().to_lowercase())
        .filter(|level| !level.is_empty())
}
