//! Record persistence errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a request record could not be persisted
#[derive(Debug, Error)]
pub enum PersistError {
    /// The record file could not be opened (missing or unwritable directory, full disk)
    #[error("failed to create record file {}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The record could not be encoded
    #[error("failed to serialize request record")]
    Serialization(#[from] serde_json::Error),

    /// I/O fault while writing the encoded record
    #[error("failed to write record file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
