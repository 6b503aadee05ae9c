//! `sr-grasp-cli` – command line access to the grasp stash.
//!
//! Loads the grasp file (the `--file` argument, or the path resolved by
//! [`StashConfig`][sr_grasp::StashConfig]) and lists, shows, validates, or
//! exports the grasps in it.

mod cli;
mod commands;

use std::process::ExitCode;

use colored::Colorize;
use tracing::debug;

use cli::Command;

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG sets the filter (default "info"); SR_GRASP_LOG_FORMAT=json
    // switches to newline-delimited JSON.  Logs go to stderr so command
    // output on stdout stays pipeable.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("SR_GRASP_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    let cli = match cli::parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}: {}", "Usage error".red(), e);
            eprint!("{}", commands::help());
            return ExitCode::from(2);
        }
    };
    debug!(?cli, "Parsed arguments");

    match run(cli) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: cli::Cli) -> Result<String, sr_grasp::StashError> {
    match cli.command {
        Command::Help => Ok(commands::help()),
        Command::Schema => commands::schema().map(|s| s + "\n"),
        Command::List => {
            let stash = commands::open_stash(cli.file)?;
            Ok(commands::list(&stash))
        }
        Command::Show(id) => {
            let stash = commands::open_stash(cli.file)?;
            commands::show(&stash, &id)
        }
        Command::Validate => {
            let stash = commands::open_stash(cli.file)?;
            Ok(format!(
                "  {} {} grasp(s) in {}\n",
                "✓".green().bold(),
                stash.len(),
                stash.path().display().to_string().bold()
            ))
        }
        Command::Export => {
            let stash = commands::open_stash(cli.file)?;
            commands::export(&stash).map(|s| s + "\n")
        }
    }
}
