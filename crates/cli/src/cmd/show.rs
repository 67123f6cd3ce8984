//! Implementation of the `cron-install show` command.

use anyhow::{Context, Result, bail};
use clap::Args;

use cron_install_lib::crontab::Crontab;
use cron_install_lib::install::show;

use super::Target;
use crate::output::{OutputFormat, print_json};

#[derive(Args, Debug)]
pub struct ShowArgs {
  #[command(flatten)]
  pub target: Target,
}

/// Print the block installed under the marker, marker lines included.
///
/// Fails when no such block exists, except in JSON output where the block is
/// reported as `null`.
pub fn cmd_show(crontab: &impl Crontab, args: ShowArgs, output: OutputFormat) -> Result<()> {
  let block = show(crontab, args.target.user.as_deref(), &args.target.marker).context("Failed to read crontab")?;

  if output.is_json() {
    return print_json(&serde_json::json!({
      "marker": args.target.marker,
      "user": args.target.user,
      "block": block,
    }));
  }

  match block {
    Some(block) => {
      println!("{block}");
      Ok(())
    }
    None => bail!("No block '{}' in {}", args.target.marker, args.target.describe()),
  }
}
