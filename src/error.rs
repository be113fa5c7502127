//! Error taxonomy shared by the geometry resolver, mapper and SyncTeX bridge.

use thiserror::Error;

/// Errors surfaced by pagesync operations.
///
/// A SyncTeX lookup that runs cleanly but finds nothing is *not* an error;
/// see [`SyncOutcome::NotFound`](crate::synctex::SyncOutcome::NotFound).
#[derive(Error, Debug)]
pub enum SyncError {
    /// Zero pages, missing page directory, or unusable layout parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown page {page} (document has {page_count} pages)")]
    UnknownPage { page: u32, page_count: usize },

    /// The oracle could not be run, timed out, or printed nothing parseable.
    #[error(
        "synctex failed ({command}){}: {diagnostic}",
        .status.map_or_else(String::new, |s| format!(" with exit code {s}"))
    )]
    OracleProcess {
        command: String,
        status: Option<i32>,
        diagnostic: String,
    },
}

impl SyncError {
    /// Stable tag used in machine-readable output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::UnknownPage { .. } => "unknown_page",
            Self::OracleProcess { .. } => "oracle_process",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
