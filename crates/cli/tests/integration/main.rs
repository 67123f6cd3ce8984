//! Integration tests driving `cron-install` against a fake crontab binary.

#![cfg(unix)]

mod install_tests;
mod show_tests;
