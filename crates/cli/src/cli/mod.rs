pub mod config;
pub mod cron;
pub mod task;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use ck_domain::config::Config;
use ck_scheduler::MissedPolicy;

/// cronkit: parse, match, preview and describe 5-field cron expressions.
#[derive(Debug, Parser)]
#[command(name = "cronkit", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the expanded field-sets of an expression as JSON.
    Parse {
        /// Cron expression, quoted (e.g. "*/15 9-17 * * 1-5").
        expr: String,
    },
    /// Check whether an expression fires at a given minute.
    Matches {
        expr: String,
        /// Civil date-time, `YYYY-MM-DDTHH:MM[:SS]`.
        datetime: String,
    },
    /// List upcoming run times.
    Next {
        expr: String,
        /// Start point (exclusive). Read as UTC when `--tz` is given.
        #[arg(long)]
        from: Option<String>,
        /// Number of runs to print (defaults to `scheduler.preview_count`).
        #[arg(long)]
        count: Option<usize>,
        /// Evaluate the expression in this IANA timezone and print UTC instants.
        #[arg(long)]
        tz: Option<String>,
    },
    /// Print a human-readable label for an expression.
    Describe { expr: String },
    /// Validate an expression, printing the error if any.
    Validate { expr: String },
    /// Evaluate an expression as a scheduled task and print its state.
    Task {
        expr: String,
        /// IANA timezone (defaults to `scheduler.default_timezone`).
        #[arg(long)]
        tz: Option<String>,
        /// Last successful run, UTC `YYYY-MM-DDTHH:MM[:SS]`.
        #[arg(long)]
        last_run: Option<String>,
        /// Evaluation instant, UTC (defaults to now).
        #[arg(long)]
        now: Option<String>,
        /// How missed windows since `--last-run` are handled.
        #[arg(long, value_enum, default_value_t = PolicyArg::RunOnce)]
        policy: PolicyArg,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Skip,
    RunOnce,
    CatchUp,
}

impl From<PolicyArg> for MissedPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Skip => MissedPolicy::Skip,
            PolicyArg::RunOnce => MissedPolicy::RunOnce,
            PolicyArg::CatchUp => MissedPolicy::CatchUp,
        }
    }
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `CRONKIT_CONFIG` (or
/// `cronkit.toml` by default). Returns the parsed [`Config`] and the path
/// that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var("CRONKIT_CONFIG").unwrap_or_else(|_| "cronkit.toml".into());
    let config = load_config_at(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_at(config_path: &str) -> anyhow::Result<Config> {
    Config::load(std::path::Path::new(config_path)).with_context(|| format!("loading {config_path}"))
}
