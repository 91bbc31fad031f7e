use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

use eyre::{eyre, Context, Result};
use serde::*;
use tracing::level_filters::LevelFilter;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Detail,
}
impl LogLevel {
    pub fn as_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Detail => LevelFilter::TRACE,
        }
    }
}
impl FromStr for LogLevel {
    type Err = eyre::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            "detail" => Ok(LogLevel::Detail),
            "off" => Ok(LogLevel::Off),
            _ => Err(eyre!("Invalid log level: {}", s)),
        }
    }
}
fn build_env_filter(log_level: LogLevel) -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env().add_directive(log_level.as_level_filter().into());
    if log_level != LogLevel::Detail {
        filter = filter
            .add_directive("hyper::proto=info".parse()?)
            .add_directive("hyper::server=info".parse()?)
            .add_directive("mio=info".parse()?)
            .add_directive("want=info".parse()?);
    }
    Ok(filter)
}

pub enum LoggingGuard {
    NonBlocking(tracing_appender::non_blocking::WorkerGuard, PathBuf),
    Stdout,
}
impl LoggingGuard {
    pub fn get_file(&self) -> Option<PathBuf> {
        match self {
            LoggingGuard::NonBlocking(_guard, path) => Some(path.clone()),
            LoggingGuard::Stdout => None,
        }
    }
}

/// Install the global subscriber. With `file` set, events go through a
/// non-blocking appender; keep the returned guard alive to flush it.
pub fn setup_logs(log_level: LogLevel, file: Option<PathBuf>) -> Result<LoggingGuard> {
    color_eyre::install()?;
    LogTracer::init().context("Cannot setup_logs")?;
    let filter = build_env_filter(log_level)?;

    let builder = fmt()
        .with_thread_names(true)
        .with_line_number(true)
        .with_env_filter(filter);
    let guard = if let Some(path) = file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let subscriber = builder.with_ansi(false).with_writer(non_blocking).finish();
        tracing::subscriber::set_global_default(subscriber).context("Cannot setup_logs")?;
        LoggingGuard::NonBlocking(guard, path)
    } else {
        let subscriber = builder.finish();
        tracing::subscriber::set_global_default(subscriber).context("Cannot setup_logs")?;
        LoggingGuard::Stdout
    };
    log_panics::init();
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("detail").unwrap().as_level_filter(), LevelFilter::TRACE);
        assert!(LogLevel::from_str("verbose").is_err());
    }
}
