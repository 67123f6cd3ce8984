//! Implementation of the `cron-install vars` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cron_install_lib::interpolate::variables;

use crate::output::{OutputFormat, print_json};

#[derive(Args, Debug)]
pub struct VarsArgs {
  /// Template file to inspect
  pub template: PathBuf,
}

/// List the variables referenced by a template, one per line.
pub fn cmd_vars(args: VarsArgs, output: OutputFormat) -> Result<()> {
  let content = std::fs::read_to_string(&args.template)
    .with_context(|| format!("Failed to read template: {}", args.template.display()))?;

  let names = variables(&content).with_context(|| format!("Failed to parse template: {}", args.template.display()))?;

  if output.is_json() {
    print_json(&names)?;
  } else {
    for name in names {
      println!("{name}");
    }
  }

  Ok(())
}
