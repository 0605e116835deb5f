//! BlobService - ゲートウェイ操作とログ記録をまとめる
//!
//! upload / download / delete はすべて結果を報告し、ログにも残します。
//! list はエラーを報告するだけで、プロセスを落としません。
//! ログの書き込み失敗は warn を出すだけで、操作の結果は変えません。

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::config::ServiceConfig;
use super::gateway::{GatewayNameStream, StorageGateway};
use super::op_logger::OperationLogger;
use crate::domain::{Action, ErrorKind, GatewayError};
use crate::ports::{Clock, ObjectStore};

/// オペレーターに見せる結果の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Success,
    ServiceError,
    Unexpected,
}

/// 1操作の結果（コンソールに表示する文）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub kind: ReportKind,
    pub message: String,
}

impl OperationReport {
    fn success(message: String) -> Self {
        Self {
            kind: ReportKind::Success,
            message,
        }
    }

    /// `service_prefix` は ServiceRequestFailed のときの前置き
    fn failure(service_prefix: &str, err: &GatewayError) -> Self {
        match err.kind() {
            ErrorKind::ServiceRequestFailed => Self {
                kind: ReportKind::ServiceError,
                message: format!("{service_prefix}: {err}"),
            },
            ErrorKind::Unexpected => Self {
                kind: ReportKind::Unexpected,
                message: format!("An unexpected error occurred: {err}"),
            },
        }
    }

    pub fn list_failed(err: &GatewayError) -> Self {
        Self::failure("Error listing blobs", err)
    }

    pub fn is_success(&self) -> bool {
        self.kind == ReportKind::Success
    }
}

pub struct BlobService {
    gateway: StorageGateway,
    logger: OperationLogger,
    config: ServiceConfig,
}

impl BlobService {
    pub fn new(store: Arc<dyn ObjectStore>, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        let logger = OperationLogger::new(
            store.clone(),
            clock,
            config.log_container.clone(),
            config.log_mode,
        );
        Self {
            gateway: StorageGateway::new(store),
            logger,
            config,
        }
    }

    pub fn logger(&self) -> &OperationLogger {
        &self.logger
    }

    pub async fn list(&self) -> GatewayNameStream {
        self.gateway.list(&self.config.container).await
    }

    pub async fn upload(&self, source: &Path, blob: &str) -> OperationReport {
        let container = &self.config.container;
        let result = self.gateway.upload(container, source, blob).await;
        self.record(Action::UploadBlob, blob, &result).await;

        match result {
            Ok(()) => {
                info!(container = %container, blob, source = %source.display(), "uploaded");
                OperationReport::success(format!(
                    "File '{}' uploaded to blob '{blob}' successfully.",
                    source.display()
                ))
            }
            Err(err) => {
                warn!(container = %container, blob, error = %err, "upload failed");
                OperationReport::failure("Error uploading file to blob", &err)
            }
        }
    }

    pub async fn download(&self, blob: &str, dest: &Path) -> OperationReport {
        let container = &self.config.container;
        let result = self
            .gateway
            .download(container, blob, dest, self.config.overwrite_downloads)
            .await;
        self.record(Action::DownloadBlob, blob, &result).await;

        match result {
            Ok(()) => {
                info!(container = %container, blob, dest = %dest.display(), "downloaded");
                OperationReport::success(format!(
                    "Blob '{blob}' downloaded to '{}' successfully.",
                    dest.display()
                ))
            }
            Err(err) => {
                warn!(container = %container, blob, error = %err, "download failed");
                OperationReport::failure("Error downloading blob", &err)
            }
        }
    }

    pub async fn delete(&self, blob: &str) -> OperationReport {
        let container = &self.config.container;
        let result = self.gateway.delete(container, blob).await;
        self.record(Action::DeleteBlob, blob, &result).await;

        match result {
            Ok(()) => {
                info!(container = %container, blob, "deleted");
                OperationReport::success(format!("Blob '{blob}' deleted successfully."))
            }
            Err(err) => {
                warn!(container = %container, blob, error = %err, "delete failed");
                OperationReport::failure("Error deleting blob", &err)
            }
        }
    }

    async fn record(&self, action: Action, blob: &str, result: &Result<(), GatewayError>) {
        let container = &self.config.container;
        let written = match result {
            Ok(()) => self.logger.record_success(action, container, blob).await,
            Err(err) => {
                self.logger
                    .record_error(action, container, blob, &err.to_string())
                    .await
            }
        };
        if let Err(err) = written {
            warn!(
                %action,
                log_container = %self.logger.container(),
                error = %err,
                "failed to write operation log"
            );
        }
    }
}
