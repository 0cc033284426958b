//! Tracing subscriber setup: console (pretty or JSON) plus optional file.

use std::path::Path;

use eyre::WrapErr;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::cli::FILE_GUARD;

fn rotation_from(name: Option<&str>) -> Rotation {
    match name {
        Some("daily") => Rotation::DAILY,
        Some("hourly") => Rotation::HOURLY,
        _ => Rotation::NEVER,
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `console_level`.
pub fn init(console_level: &str, json: bool, cfg: &brew_config::Logging) -> eyre::Result<()> {
    let console_filter = || {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(console_level))
            .wrap_err_with(|| format!("invalid log level {console_level:?}"))
    };

    let (pretty, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    let file_layer = match cfg.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {file:?} has no file name"))?;
            let appender =
                RollingFileAppender::new(rotation_from(cfg.rotation.as_deref()), dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let level = cfg.level.as_deref().unwrap_or("info");
            let filter = EnvFilter::try_new(level)
                .wrap_err_with(|| format!("invalid logging.level {level:?}"))?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(pretty.with_filter(console_filter()?))
        .with(structured.with_filter(console_filter()?))
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("install tracing subscriber: {e}"))
}
