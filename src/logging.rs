// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File logging. The terminal belongs to the TUI, so nothing is written to stdout/stderr.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, ParseError};

pub const LOG_ENV: &str = "CALLNAV_LOG";
pub const LOG_FILE_NAME: &str = "callnav.log";

#[derive(Debug)]
pub enum LoggingError {
    Io { path: PathBuf, source: io::Error },
    Filter { directives: String, source: ParseError },
    Install { message: String },
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "create log directory {}: {source}", path.display())
            }
            Self::Filter { directives, source } => {
                write!(f, "invalid log filter {directives:?} (from {LOG_ENV} or config): {source}")
            }
            Self::Install { message } => write!(f, "install log subscriber: {message}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Filter { source, .. } => Some(source),
            Self::Install { .. } => None,
        }
    }
}

/// `$CALLNAV_LOG` when set, else `default_directives`.
pub fn filter(default_directives: &str) -> Result<EnvFilter, LoggingError> {
    let directives = env::var(LOG_ENV).unwrap_or_else(|_| default_directives.to_owned());
    EnvFilter::try_new(&directives).map_err(|source| LoggingError::Filter { directives, source })
}

/// Installs the global subscriber writing to `<dir>/callnav.log`.
///
/// Keep the returned guard alive until exit; dropping it flushes and stops the writer.
pub fn init(dir: &Path, default_directives: &str) -> Result<WorkerGuard, LoggingError> {
    let filter = filter(default_directives)?;
    fs::create_dir_all(dir).map_err(|source| LoggingError::Io { path: dir.to_owned(), source })?;

    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_line_number(true)
        .try_init()
        .map_err(|err| LoggingError::Install { message: err.to_string() })?;

    tracing::info!(log = %dir.join(LOG_FILE_NAME).display(), "logging started");
    Ok(guard)
}

/// Logs the error that ends the process, then flushes the log file by dropping `guard`.
pub fn log_fatal(err: &dyn std::error::Error, guard: Option<WorkerGuard>) {
    tracing::error!(error = %err, "callnav exited with an error");
    drop(guard);
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use rstest::rstest;

    use super::{filter, log_fatal, LoggingError};

    #[rstest]
    #[case::level("info")]
    #[case::per_target("callnav=debug,warn")]
    fn accepts_filter_directives(#[case] directives: &str) {
        if std::env::var_os(super::LOG_ENV).is_some() {
            return;
        }
        assert!(filter(directives).is_ok());
    }

    #[test]
    fn rejects_malformed_directives() {
        if std::env::var_os(super::LOG_ENV).is_some() {
            return;
        }
        let err = filter("callnav=[").expect_err("malformed");
        assert!(matches!(err, LoggingError::Filter { .. }));
    }

    #[test]
    fn fatal_error_reaches_the_log_file() {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let path = std::env::temp_dir()
            .join(format!("callnav-fatal-{}-{nanos}.log", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let (writer, guard) = tracing_appender::non_blocking(file);
        let subscriber =
            tracing_subscriber::fmt().with_writer(writer).with_ansi(false).finish();

        let err = std::io::Error::other("dataset vanished");
        tracing::subscriber::with_default(subscriber, || log_fatal(&err, Some(guard)));

        let logged = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(logged.contains("callnav exited with an error"), "log was {logged:?}");
        assert!(logged.contains("dataset vanished"));
    }
}
