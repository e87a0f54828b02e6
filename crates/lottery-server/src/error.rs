//! Error types owned by the server crate: persistence and top-level
//! startup failures.

use thiserror::Error;

/// Persistence I/O failures. Logged and best-effort-acked by the
/// worker that hit them; never terminates the worker.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encode/decode failure.
    #[error("store CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A persisted row did not decode back into a well-formed bet.
    #[error("corrupt bet record: {0}")]
    CorruptRecord(String),
}

/// Startup failures that abort the process with a non-zero status.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Failed to bind or listen on the configured address.
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        /// The address that failed to bind.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or create the bet store file.
    #[error("failed to open bet store: {0}")]
    Store(#[from] StoreError),

    /// Failed to install the signal handler.
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
