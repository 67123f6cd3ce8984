use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cron_install_lib::crontab::CrontabCommand;

mod cmd;
mod output;

use cmd::{InstallArgs, RemoveArgs, ShowArgs, VarsArgs, cmd_install, cmd_remove, cmd_show, cmd_vars};
use output::{OutputFormat, print_error};

/// cron-install - keep a named block of entries in a crontab up to date
#[derive(Parser)]
#[command(name = "cron-install")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  /// crontab binary to run [default: $CRON_INSTALL_CRONTAB, then `crontab`]
  #[arg(long, global = true, value_name = "PATH")]
  crontab: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Shorthand for `--output json`
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Install or refresh a block from a template
  Install(InstallArgs),

  /// Remove a block
  Remove(RemoveArgs),

  /// Print the installed block
  Show(ShowArgs),

  /// List the variables a template references
  Vars(VarsArgs),
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let crontab = cli
    .crontab
    .map(CrontabCommand::new)
    .unwrap_or_else(CrontabCommand::from_env);

  let output = if cli.json { OutputFormat::Json } else { cli.output };

  let result = match cli.command {
    Commands::Install(args) => cmd_install(&crontab, args, output),
    Commands::Remove(args) => cmd_remove(&crontab, args, output),
    Commands::Show(args) => cmd_show(&crontab, args, output),
    Commands::Vars(args) => cmd_vars(args, output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
