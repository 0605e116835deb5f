//! OperationLogger - 操作ログを日付ごとの log blob に書き込む
//!
//! log blob の名前は `log_blob_name(date)` の純粋関数で決まり、
//! 日付は注入された Clock から取ります。
//!
//! # 書き込みモード
//! - Overwrite（既定）: 毎回1レコードで上書き。同日の以前のレコードは残らない
//! - Append: 既存の内容を読んでから末尾に追記して書き戻す（既存バイトはそのまま）
//!
//! log コンテナは最初の書き込み前に1回だけ用意します。
//! put が not-found で失敗したときだけ作り直して再試行します。

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::config::LogMode;
use crate::domain::{Action, LogRecord, log_blob_name};
use crate::ports::{Clock, ObjectStore, StoreError};

pub struct OperationLogger {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    container: String,
    mode: LogMode,
    container_ready: OnceCell<()>,
}

impl OperationLogger {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
        container: impl Into<String>,
        mode: LogMode,
    ) -> Self {
        Self {
            store,
            clock,
            container: container.into(),
            mode,
            container_ready: OnceCell::new(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn log_blob_name_for_today(&self) -> String {
        log_blob_name(self.clock.now().date_naive())
    }

    pub async fn record_success(
        &self,
        action: Action,
        container: &str,
        blob: &str,
    ) -> Result<(), StoreError> {
        let record = LogRecord::success(action, container, blob, self.clock.now());
        self.write(&record).await
    }

    pub async fn record_error(
        &self,
        action: Action,
        container: &str,
        blob: &str,
        error_detail: &str,
    ) -> Result<(), StoreError> {
        let record = LogRecord::error(action, container, blob, error_detail, self.clock.now());
        self.write(&record).await
    }

    async fn write(&self, record: &LogRecord) -> Result<(), StoreError> {
        self.container_ready
            .get_or_try_init(|| self.store.ensure_container(&self.container))
            .await?;

        let name = log_blob_name(record.timestamp.date_naive());
        let line = record.to_line();
        let body = match self.mode {
            LogMode::Overwrite => Bytes::from(line),
            LogMode::Append => {
                let existing = match self.store.get_object(&self.container, &name).await {
                    Ok(existing) => existing,
                    Err(e) if e.is_not_found() => Bytes::new(),
                    Err(e) => return Err(e),
                };
                let mut body = BytesMut::with_capacity(existing.len() + line.len());
                body.extend_from_slice(&existing);
                body.extend_from_slice(line.as_bytes());
                body.freeze()
            }
        };

        debug!(container = %self.container, blob = %name, mode = ?self.mode, "writing log record");
        match self.store.put_object(&self.container, &name, body.clone()).await {
            // コンテナが外から消された場合は作り直して1回だけ再試行
            Err(e) if e.is_not_found() => {
                warn!(container = %self.container, error = %e, "log container missing, recreating");
                self.store.ensure_container(&self.container).await?;
                self.store.put_object(&self.container, &name, body).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{InMemoryObjectStore, LocalFsObjectStore, StoreOp};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    fn logger(mode: LogMode) -> (InMemoryObjectStore, OperationLogger) {
        let store = InMemoryObjectStore::new();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap());
        let logger = OperationLogger::new(Arc::new(store.clone()), Arc::new(clock), "logs", mode);
        (store, logger)
    }

    async fn log_text(store: &InMemoryObjectStore, name: &str) -> String {
        let bytes = store.peek("logs", name).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn log_name_comes_from_clock() {
        let (_store, logger) = logger(LogMode::Overwrite);
        assert_eq!(logger.log_blob_name_for_today(), "log_20240307.txt");
    }

    #[tokio::test]
    async fn success_writes_exactly_one_record() {
        let (store, logger) = logger(LogMode::Overwrite);

        logger
            .record_success(Action::UploadBlob, "pictures", "cat.png")
            .await
            .unwrap();

        let puts = store.calls_of(StoreOp::Put).await;
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].container, "logs");
        assert_eq!(puts[0].name.as_deref(), Some("log_20240307.txt"));
        assert_eq!(
            log_text(&store, "log_20240307.txt").await,
            "[SUCCESS] Action: UploadBlob, Container: pictures, Blob: cat.png, Timestamp: 2024-03-07T09:05:01Z\n"
        );
    }

    #[tokio::test]
    async fn overwrite_mode_keeps_only_latest_record() {
        let (store, logger) = logger(LogMode::Overwrite);

        logger
            .record_success(Action::UploadBlob, "pictures", "first")
            .await
            .unwrap();
        logger
            .record_error(Action::DeleteBlob, "pictures", "second", "nope")
            .await
            .unwrap();

        let text = log_text(&store, "log_20240307.txt").await;
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("[ERROR] Action: DeleteBlob"));
        assert!(text.contains("Error: nope"));
        assert!(store.calls_of(StoreOp::Get).await.is_empty());
    }

    #[tokio::test]
    async fn append_mode_accumulates_same_day_records() {
        let (store, logger) = logger(LogMode::Append);

        logger
            .record_success(Action::UploadBlob, "pictures", "first")
            .await
            .unwrap();
        logger
            .record_success(Action::DownloadBlob, "pictures", "second")
            .await
            .unwrap();

        let text = log_text(&store, "log_20240307.txt").await;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Blob: first"));
        assert!(lines[1].contains("Blob: second"));
    }

    #[tokio::test]
    async fn log_container_is_ensured_once() {
        let (store, logger) = logger(LogMode::Overwrite);
        for _ in 0..3 {
            logger
                .record_success(Action::UploadBlob, "pictures", "x")
                .await
                .unwrap();
        }
        assert_eq!(store.calls_of(StoreOp::EnsureContainer).await.len(), 1);
    }

    #[tokio::test]
    async fn write_failure_is_returned() {
        let (store, logger) = logger(LogMode::Overwrite);
        store
            .fail_next(StoreOp::Put, StoreError::Other("log store down".to_string()))
            .await;

        let err = logger
            .record_success(Action::UploadBlob, "pictures", "x")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "log store down");
    }

    #[tokio::test]
    async fn append_keeps_existing_bytes_verbatim() {
        let (store, logger) = logger(LogMode::Append);
        let old: &[u8] = b"\xff\xfe legacy\n";
        store.ensure_container("logs").await.unwrap();
        store
            .put_object("logs", "log_20240307.txt", Bytes::from_static(old))
            .await
            .unwrap();

        logger
            .record_success(Action::UploadBlob, "pictures", "cat.png")
            .await
            .unwrap();

        let bytes = store.peek("logs", "log_20240307.txt").await.unwrap();
        assert!(bytes.starts_with(old));
        assert_eq!(
            &bytes[old.len()..],
            b"[SUCCESS] Action: UploadBlob, Container: pictures, Blob: cat.png, Timestamp: 2024-03-07T09:05:01Z\n"
        );
    }

    #[tokio::test]
    async fn missing_log_container_is_recreated_once() {
        let (store, logger) = logger(LogMode::Overwrite);
        logger
            .record_success(Action::UploadBlob, "pictures", "first")
            .await
            .unwrap();
        store
            .fail_next_in("logs", StoreOp::Put, StoreError::container_not_found("logs"))
            .await;

        logger
            .record_success(Action::UploadBlob, "pictures", "second")
            .await
            .unwrap();

        assert_eq!(store.calls_of(StoreOp::EnsureContainer).await.len(), 2);
        assert_eq!(store.calls_of(StoreOp::Put).await.len(), 3);
        assert!(log_text(&store, "log_20240307.txt").await.contains("Blob: second"));
    }

    #[tokio::test]
    async fn removed_log_directory_is_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFsObjectStore::open(dir.path()).await.unwrap();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap());
        let logger = OperationLogger::new(Arc::new(store), Arc::new(clock), "logs", LogMode::Overwrite);

        logger
            .record_success(Action::UploadBlob, "pictures", "first")
            .await
            .unwrap();
        std::fs::remove_dir_all(dir.path().join("logs")).unwrap();
        logger
            .record_success(Action::DeleteBlob, "pictures", "second")
            .await
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join("logs/log_20240307.txt")).unwrap();
        assert!(text.starts_with("[SUCCESS] Action: DeleteBlob"));
    }

    #[tokio::test]
    async fn retry_is_not_attempted_for_other_failures() {
        let (store, logger) = logger(LogMode::Overwrite);
        store
            .fail_next(StoreOp::Put, StoreError::request_failed(403, "AuthorizationFailure", "denied"))
            .await;

        assert!(logger
            .record_success(Action::UploadBlob, "pictures", "x")
            .await
            .is_err());
        assert_eq!(store.calls_of(StoreOp::Put).await.len(), 1);
        assert_eq!(store.calls_of(StoreOp::EnsureContainer).await.len(), 1);
    }
}
