//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "brewctl", version, about = "Brewery pH sensor controller")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/brewctl.toml")]
    pub config: PathBuf,

    /// Emit JSON lines instead of text (output and logs)
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum UnitArg {
    C,
    F,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take one reading from every configured sensor and compute pH
    Read,
    /// Poll sensors on the configured cadence and print status batches
    Poll {
        /// Stop after this many batches (default: run until Ctrl-C)
        #[arg(long, value_name = "N")]
        count: Option<u64>,
        /// Override poll.interval_ms from the config
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
    /// List calibration models with a registered formula
    Models,
    /// Print the fermentation schedule as recipe XML
    FermentXml {
        /// Convert every step's temperature to this unit first
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,
    },
    /// Validate config and open every configured input
    SelfCheck,
}
