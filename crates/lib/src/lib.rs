//! cron-install-lib: managed blocks inside a crontab
//!
//! This crate owns the logic behind `cron-install`:
//! - `interpolate`: `$NAME` / `${NAME}` / `$$` substitution over template text
//! - `marker`: locating, stripping and rendering `# START` / `# END` blocks
//! - `install`: the read, interpolate, split, render, write pipeline
//! - `crontab`: the two-call table service and its process and in-memory backends
//! - `vars`: assembling a substitution table from env, JSON files and assignments

pub mod consts;
pub mod crontab;
pub mod install;
pub mod interpolate;
pub mod marker;
pub mod util;
pub mod vars;
