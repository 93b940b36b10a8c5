use std::io::Write;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use ck_cli::cli::task::TaskArgs;
use ck_cli::cli::{Cli, Command, ConfigCommand};
use ck_domain::config::LoggingConfig;
use ck_scheduler::TracingSink;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Load config first so its logging section can drive the subscriber.
    let (config, config_path) = ck_cli::cli::load_config()?;
    init_tracing(&config.logging);

    match command {
        Command::Parse { expr } => ck_cli::cli::cron::parse(&expr, &mut out),
        Command::Matches { expr, datetime } => {
            ck_cli::cli::cron::matches(&expr, &datetime, &mut out)
        }
        Command::Next {
            expr,
            from,
            count,
            tz,
        } => ck_cli::cli::cron::next(
            &expr,
            from.as_deref(),
            count,
            tz.as_deref(),
            &config.scheduler,
            &mut out,
        ),
        Command::Describe { expr } => ck_cli::cli::cron::describe(&expr, &mut out),
        Command::Validate { expr } => {
            let valid = ck_cli::cli::cron::validate(&expr, &mut out)?;
            if !valid {
                out.flush()?;
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Task {
            expr,
            tz,
            last_run,
            now,
            policy,
        } => {
            let args = TaskArgs {
                expr: &expr,
                tz: tz.as_deref(),
                last_run: last_run.as_deref(),
                now: now.as_deref(),
                policy: policy.into(),
            };
            ck_cli::cli::task::run(args, &config.scheduler, TracingSink, &mut out)
        }
        Command::Config(ConfigCommand::Validate) => {
            let valid = ck_cli::cli::config::validate(&config, &config_path, &mut out)?;
            if !valid {
                out.flush()?;
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => ck_cli::cli::config::show(&config, &mut out),
        Command::Version => {
            writeln!(out, "cronkit {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `logging.filter`.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
