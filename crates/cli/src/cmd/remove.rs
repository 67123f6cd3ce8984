//! Implementation of the `cron-install remove` command.

use anyhow::{Context, Result};
use clap::Args;

use cron_install_lib::crontab::Crontab;
use cron_install_lib::install::{RemoveRequest, remove};

use super::Target;
use crate::output::{OutputFormat, print_info, print_json, print_success, print_table, print_warning};

#[derive(Args, Debug)]
pub struct RemoveArgs {
  #[command(flatten)]
  pub target: Target,

  /// Print the resulting crontab instead of writing it
  #[arg(long)]
  pub dry_run: bool,

  /// Fail if the crontab has a START or END line without its counterpart
  #[arg(long)]
  pub strict: bool,
}

/// Execute the remove command.
///
/// Removing a marker that is not installed is not an error; the crontab is
/// left untouched.
pub fn cmd_remove(crontab: &impl Crontab, args: RemoveArgs, output: OutputFormat) -> Result<()> {
  let request = RemoveRequest {
    marker: args.target.marker.clone(),
    user: args.target.user.clone(),
    dry_run: args.dry_run,
    strict: args.strict,
  };

  let outcome = remove(crontab, &request)
    .with_context(|| format!("Failed to remove block '{}'", args.target.marker))?;

  if output.is_json() {
    return print_json(&outcome);
  }

  if let Some(dangling) = outcome.dangling {
    print_warning(&format!("Ignored stray marker: {dangling}"));
  }

  if !outcome.removed {
    print_info(&format!("No block '{}' in {}", outcome.marker, args.target.describe()));
  } else if outcome.dry_run {
    print_table(&outcome.table);
  } else {
    print_success(&format!("Removed block '{}' from {}", outcome.marker, args.target.describe()));
  }

  Ok(())
}
