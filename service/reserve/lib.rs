/// service entry point
pub mod app;
/// toml config
pub mod config;
/// tick consumers
pub mod fetcher;
pub mod http_runner;

pub use app::{exit_on_fatal, run, ReserveApp, FATAL_EXIT_CODE};
