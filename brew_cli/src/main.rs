#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod commands;
mod error_fmt;
mod hw;
mod logging;

use clap::Parser;
use eyre::WrapErr;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;

    // `models` needs no config
    if let Commands::Models = cli.cmd {
        commands::models(cli.json);
        return Ok(());
    }

    let text = std::fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {}", cli.config.display()))?;
    let cfg = brew_config::load_toml(&text)
        .map_err(eyre::Report::new)
        .and_then(|c| c.validate().map(|()| c))
        .wrap_err("invalid configuration")?;

    logging::init(&cli.log_level, cli.json, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), sensors = cfg.sensors.len(), "config loaded");

    match cli.cmd {
        Commands::Read => commands::read(&cfg, cli.json),
        Commands::Poll { count, interval_ms } => {
            commands::poll(&cfg, cli.json, count, interval_ms)
        }
        Commands::Models => {
            commands::models(cli.json);
            Ok(())
        }
        Commands::FermentXml { unit } => commands::ferment_xml(&cfg, unit),
        Commands::SelfCheck => commands::self_check(&cfg, cli.json),
    }
}
