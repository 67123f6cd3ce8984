mod install;
mod remove;
mod show;
mod vars;

use clap::Args;
use cron_install_lib::marker::Marker;

pub use install::{InstallArgs, cmd_install};
pub use remove::{RemoveArgs, cmd_remove};
pub use show::{ShowArgs, cmd_show};
pub use vars::{VarsArgs, cmd_vars};

/// Which block, in whose crontab.
#[derive(Args, Debug, Clone)]
pub struct Target {
  /// Marker naming the block (`# START <MARKER>` ... `# END <MARKER>`)
  #[arg(short, long)]
  pub marker: Marker,

  /// Edit this user's crontab instead of your own
  #[arg(short, long)]
  pub user: Option<String>,
}

impl Target {
  /// "crontab" or "bob's crontab", for messages.
  pub fn describe(&self) -> String {
    match &self.user {
      Some(user) => format!("{user}'s crontab"),
      None => "crontab".to_string(),
    }
  }
}
