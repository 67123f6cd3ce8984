/// Environment variable naming the crontab binary to drive.
pub const CRONTAB_BIN_ENV: &str = "CRON_INSTALL_CRONTAB";

pub const DEFAULT_CRONTAB_BIN: &str = "crontab";

/// Prefix of the line opening a managed block.
pub const START_PREFIX: &str = "# START ";

/// Prefix of the line closing a managed block.
pub const END_PREFIX: &str = "# END ";
