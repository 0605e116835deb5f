//! Errors that end the process.
//!
//! Failures of individual blob operations never get here; they are
//! reported on the console and the loop keeps going.

use blobkeeper_core::ports::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open object store: {0}")]
    Store(#[from] StoreError),
}
