use std::io;

use thiserror::Error;

/// Failures surfaced by a [`PageDriver`](crate::driver::PageDriver)
/// implementation. Phase code maps these into [`ScrapeError`] according to
/// context: a missing element mid-extraction is a skip, a dead session is not.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no element matching '{0}'")]
    ElementMissing(String),
    #[error("timed out waiting for '{0}'")]
    Timeout(String),
    #[error("browser session failure: {0}")]
    Session(String),
}

/// Error taxonomy for the whole run.
///
/// `Authentication` and `SessionTerminated` are fatal and abort the process.
/// `ExpansionTimeout` is retried a bounded number of times and then treated as
/// list exhaustion. `Extraction` applies to a single profile and is always
/// skipped, never propagated past the extraction loop.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("expansion click timed out on '{0}'")]
    ExpansionTimeout(String),
    #[error("extraction failed for {url}: {reason}")]
    Extraction { url: String, reason: String },
    #[error("browser session terminated: {0}")]
    SessionTerminated(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("csv write failure: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Driver failures outside any per-profile context are session-level.
    pub fn session(err: DriverError) -> Self {
        ScrapeError::SessionTerminated(err.to_string())
    }
}
