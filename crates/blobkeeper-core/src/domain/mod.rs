//! Domain model (log records, error classification).

pub mod errors;
pub mod log_record;

pub use self::errors::{ErrorKind, GatewayError};
pub use self::log_record::{Action, LogOutcome, LogRecord, log_blob_name};
