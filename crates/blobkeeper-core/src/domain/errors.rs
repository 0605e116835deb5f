//! Errors - ゲートウェイのエラー型と分類
//!
//! オペレーターに見せる分類は2種類だけです。
//! - ServiceRequestFailed: ストアが status 付きで失敗を返した
//! - Unexpected: それ以外（ローカル I/O、事前条件違反、不明な障害）

use std::path::PathBuf;

use thiserror::Error;

use crate::ports::StoreError;

/// ErrorKind はゲートウェイエラーの運用分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ServiceRequestFailed,
    Unexpected,
}

/// GatewayError は StorageGateway の操作が返すエラー
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{message} (status: {status}, code: {code})")]
    ServiceRequestFailed {
        status: u16,
        code: String,
        message: String,
    },

    #[error("File '{}' already exists and overwrite is not enabled.", .0.display())]
    DestinationExists(PathBuf),

    #[error("Blob '{0}' does not exist.")]
    BlobNotFound(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::ServiceRequestFailed { .. } => ErrorKind::ServiceRequestFailed,
            GatewayError::DestinationExists(_)
            | GatewayError::BlobNotFound(_)
            | GatewayError::Io { .. }
            | GatewayError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GatewayError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RequestFailed {
                status,
                code,
                message,
            } => GatewayError::ServiceRequestFailed {
                status,
                code,
                message,
            },
            other => GatewayError::Unexpected(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::request_failed(StoreError::not_found("BlobNotFound", "gone"), ErrorKind::ServiceRequestFailed)]
    #[case::throttled(StoreError::request_failed(503, "ServerBusy", "slow down"), ErrorKind::ServiceRequestFailed)]
    #[case::opaque(StoreError::Other("socket closed".to_string()), ErrorKind::Unexpected)]
    fn store_errors_keep_their_kind(#[case] err: StoreError, #[case] expected: ErrorKind) {
        let gw: GatewayError = err.into();
        assert_eq!(gw.kind(), expected);
    }

    #[test]
    fn precondition_errors_are_unexpected() {
        assert_eq!(
            GatewayError::DestinationExists(PathBuf::from("out.bin")).kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(
            GatewayError::BlobNotFound("a".to_string()).kind(),
            ErrorKind::Unexpected
        );
    }

    #[test]
    fn messages_are_operator_readable() {
        let err = GatewayError::BlobNotFound("cat.png".to_string());
        assert_eq!(err.to_string(), "Blob 'cat.png' does not exist.");

        let err = GatewayError::DestinationExists(PathBuf::from("/tmp/cat.png"));
        assert_eq!(
            err.to_string(),
            "File '/tmp/cat.png' already exists and overwrite is not enabled."
        );

        let err: GatewayError = StoreError::request_failed(403, "AuthorizationFailure", "denied").into();
        assert_eq!(
            err.to_string(),
            "denied (status: 403, code: AuthorizationFailure)"
        );
    }
}
