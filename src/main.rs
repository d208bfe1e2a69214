mod commands;
mod core;
mod release;

use crate::core::error::{ShipError, print_error};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release detection and artifact publishing for trunk-based CI pipelines
#[derive(Parser)]
#[command(name = "shipway")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct ShipwayCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the full pipeline: detect, deduce, collect, stamp, publish
  Run {
    /// Override the staging directory from shipway.toml
    #[arg(long)]
    staging: Option<PathBuf>,
    /// Output the outcome in JSON format
    #[arg(long)]
    json: bool,
    /// Write `key=value` outcome lines to this file (default: $SHIPWAY_OUTPUT / $GITHUB_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Stop before publishing; collect and stamp only
    #[arg(long)]
    dry_run: bool,
  },

  /// Evaluate the release signal and deduce the tag, nothing else
  Detect {
    /// Output the outcome in JSON format
    #[arg(long)]
    json: bool,
    /// Write `key=value` outcome lines to this file (default: $SHIPWAY_OUTPUT / $GITHUB_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,
  },

  /// Wait for and validate the staged artifact set
  Collect {
    /// Override the staging directory from shipway.toml
    #[arg(long)]
    staging: Option<PathBuf>,
    /// Check once instead of waiting out the barrier
    #[arg(long)]
    no_wait: bool,
    /// Output the artifact listing in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Write detached .sha256 files for the staged artifacts
  Checksum {
    /// Override the staging directory from shipway.toml
    #[arg(long)]
    staging: Option<PathBuf>,
    /// Output the manifest in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = ShipwayCli::parse();

  let result = match cli.command {
    Commands::Run {
      staging,
      json,
      output,
      dry_run,
    } => commands::run_run(staging, json, output, dry_run),
    Commands::Detect { json, output } => commands::run_detect(json, output),
    Commands::Collect { staging, no_wait, json } => commands::run_collect(staging, no_wait, json),
    Commands::Checksum { staging, json } => commands::run_checksum(staging, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
