// scoring_publisher_app/src/main.rs

mod commands;
mod config;
mod errors;
mod state;

use crate::commands::{BuildArgs, PublishArgs};
use crate::config::AppConfig;
use crate::errors::Result as AppResult;
use crate::state::AppState;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "scoring-publisher", version, about = "Build H2O scoring engines and publish them to the marketplace")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Fetch, compile and package a model into a scoring-engine archive
  Build(BuildArgs),
  /// Resolve the marketplace offering for an artifact and provision an instance
  Publish(PublishArgs),
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

  // stdout carries the command result, logs go to stderr.
  if json {
    tracing_subscriber::fmt()
      .json()
      .with_env_filter(filter)
      .with_span_events(FmtSpan::CLOSE)
      .with_writer(std::io::stderr)
      .init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_span_events(FmtSpan::CLOSE)
      .with_writer(std::io::stderr)
      .init();
  }
}

async fn run(cli: Cli) -> AppResult<()> {
  let config = Arc::new(AppConfig::from_env()?);
  let state = AppState::new(config)?;

  let cancel = CancellationToken::new();
  tokio::spawn({
    let cancel = cancel.clone();
    async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupt received, cancelling.");
        cancel.cancel();
      }
    }
  });

  match cli.command {
    Command::Build(args) => commands::build(&state, args, &cancel).await,
    Command::Publish(args) => commands::publish(&state, args, cancel).await,
  }
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing();

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!(error = %e, "Command failed.");
      eprintln!("Error: {}", e);
      ExitCode::from(e.exit_code())
    }
  }
}
