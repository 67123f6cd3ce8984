//! Implementation of the `cron-install install` command.
//!
//! Interpolates a template and installs it as a managed block, replacing the
//! block previously installed under the same marker.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use cron_install_lib::crontab::Crontab;
use cron_install_lib::install::{InstallOutcome, InstallRequest, install};
use cron_install_lib::vars::{self, Substitutions};

use super::Target;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, print_table, print_warning};

#[derive(Args, Debug)]
pub struct InstallArgs {
  /// Template file with the block's entries
  pub template: PathBuf,

  #[command(flatten)]
  pub target: Target,

  /// Bind a template variable (repeatable)
  #[arg(long = "var", value_name = "NAME=VALUE", value_parser = vars::parse_assignment)]
  pub vars: Vec<(String, String)>,

  /// JSON object of template variables
  #[arg(long, value_name = "FILE")]
  pub vars_file: Option<PathBuf>,

  /// Make every environment variable available to the template
  #[arg(long)]
  pub env: bool,

  /// Print the resulting crontab instead of installing it
  #[arg(long)]
  pub dry_run: bool,

  /// Fail if the crontab has a START or END line without its counterpart
  #[arg(long)]
  pub strict: bool,
}

impl InstallArgs {
  /// Merge variable sources: environment, then the JSON file, then `--var`.
  pub fn substitutions(&self) -> Result<Substitutions> {
    let mut substitutions = if self.env { vars::from_env() } else { Substitutions::new() };

    if let Some(ref path) = self.vars_file {
      let from_file = vars::from_json_file(path).context("Failed to load variables file")?;
      substitutions.extend(from_file);
    }

    substitutions.extend(self.vars.iter().cloned());
    Ok(substitutions)
  }
}

/// Execute the install command.
///
/// Reads the current crontab, swaps in the freshly rendered block at the end
/// and writes the crontab back. With `--dry-run` the new crontab is printed
/// and nothing is written.
pub fn cmd_install(crontab: &impl Crontab, args: InstallArgs, output: OutputFormat) -> Result<()> {
  let substitutions = args.substitutions()?;
  debug!(count = substitutions.len(), "assembled substitutions");

  let request = InstallRequest {
    marker: args.target.marker.clone(),
    template: args.template.clone(),
    substitutions,
    user: args.target.user.clone(),
    dry_run: args.dry_run,
    strict: args.strict,
  };

  let outcome = install(crontab, &request)
    .with_context(|| format!("Failed to install block '{}'", args.target.marker))?;

  if output.is_json() {
    print_json(&outcome)?;
  } else {
    print_outcome(&args.target, &outcome);
  }

  Ok(())
}

fn print_outcome(target: &Target, outcome: &InstallOutcome) {
  if let Some(dangling) = outcome.dangling {
    print_warning(&format!("Ignored stray marker: {dangling}"));
  }

  if outcome.dry_run {
    print_table(&outcome.table);
    return;
  }

  let verb = if outcome.replaced { "Updated" } else { "Installed" };
  print_success(&format!("{verb} block '{}' in {}", outcome.marker, target.describe()));
  if !outcome.changed {
    print_info("Crontab was already up to date");
  }
  print_stat("Lines", &outcome.table.lines().count().to_string());
}
