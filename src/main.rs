use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use crossterm::style::{style, Stylize};

mod actions;
mod app;
mod cli;
mod config;
mod error;
mod launch;
mod listing;
mod output;
mod picker;
mod probe;
mod registry;
mod runner;
mod tmux;

use app::App;
use cli::{Cli, Commands};
use config::Config;
use error::BoError;
use output::Console;
use picker::FzfPicker;
use registry::RegistryKind;
use runner::ProcessRunner;

const REGISTRY_HINT: &str =
    "Create it with one project path per line, or one YAML document per project for `bo browse`";

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let mut console = Console::stdio();

    match run(cli, &mut console).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, &mut console);
            ExitCode::FAILURE
        }
    }
}

async fn run<O: Write, E: Write>(cli: Cli, console: &mut Console<O, E>) -> Result<()> {
    let config = Config::load();
    let runner = ProcessRunner::new(config.probe_timeout());
    let picker = FzfPicker::new(&config.picker);
    let app = App::new(&config, &runner, &picker);

    match cli.command {
        Commands::Open(args) => {
            app.open(RegistryKind::Plain, args.sessions_only, console)
                .await?
        }
        Commands::Browse(args) => {
            app.open(RegistryKind::Structured, args.sessions_only, console)
                .await?
        }
        Commands::Status(args) => app.status(args.sessions_only, console).await?,
    }
    Ok(())
}

fn report<O: Write, E: Write>(err: &anyhow::Error, console: &mut Console<O, E>) {
    let message = match err.downcast_ref::<BoError>() {
        Some(e) if e.is_missing_registry() => format!(
            "{}\n{}",
            style(e.to_string()).red(),
            style(REGISTRY_HINT).yellow()
        ),
        _ => format!("{} {:#}", style("Error:").red(), err),
    };
    let _ = console.notice(&message);
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("BO_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
