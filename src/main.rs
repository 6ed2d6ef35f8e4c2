mod commands;
mod core;
mod github;
mod license;
mod logging;
mod search;
mod ui;
mod utils;

use clap::{Args, Parser, Subcommand};
use core::config::ConfigOverrides;
use core::error::{ActionError, print_error};
use std::path::PathBuf;

/// Keep license copyright years current
#[derive(Parser)]
#[command(name = "license-year")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Update license files on the year branch, push it and open a pull request
  Run {
    #[command(flatten)]
    inputs: InputArgs,
    /// Remote to fetch the branch from and push it to
    #[arg(long, default_value = "origin")]
    remote: String,
    /// Push the branch but do not open a pull request
    #[arg(long)]
    no_pull_request: bool,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Rewrite copyright years in local files (default: dry-run)
  Transform {
    /// Files to check (default: the configured `path` globs)
    files: Vec<PathBuf>,
    #[command(flatten)]
    inputs: InputArgs,
    /// Actually write the updated files
    #[arg(long)]
    apply: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// List the built-in copyright notice dialects
  Dialects {
    /// Output dialects in JSON format
    #[arg(long)]
    json: bool,
  },
}

/// Overrides for action inputs
#[derive(Args)]
struct InputArgs {
  /// Year to update to (default: the current year)
  #[arg(long)]
  current_year: Option<u32>,
  /// Glob of license files, relative to the repository root
  #[arg(long)]
  path: Option<String>,
  /// Custom pattern with a `from` capture group, replacing the built-in dialects
  #[arg(long)]
  transform: Option<String>,
  /// Config file (default: license-year.toml, .license-year.toml, .github/license-year.toml)
  #[arg(long)]
  config: Option<PathBuf>,
}

impl From<InputArgs> for ConfigOverrides {
  fn from(args: InputArgs) -> Self {
    ConfigOverrides {
      config_file: args.config,
      path: args.path,
      transform: args.transform,
      current_year: args.current_year,
    }
  }
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
  let cli = Cli::parse();
  logging::init();

  let result = match cli.command {
    Commands::Run {
      inputs,
      remote,
      no_pull_request,
      json,
    } => commands::run_action(commands::RunOptions {
      overrides: inputs.into(),
      remote,
      no_pull_request,
      json,
    }),
    Commands::Transform {
      files,
      inputs,
      apply,
      json,
    } => commands::run_transform(commands::TransformOptions {
      files,
      overrides: inputs.into(),
      apply,
      json,
    }),
    Commands::Dialects { json } => commands::run_dialects(json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ActionError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
