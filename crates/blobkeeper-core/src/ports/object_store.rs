//! ObjectStore port - コンテナ／Blob のストレージ
//!
//! 実際のオブジェクトストレージ（クラウドの Blob サービスなど）への
//! 最小インターフェースです。転送・認証・リトライは実装側の責務です。
//!
//! # 実装
//! - **InMemoryObjectStore**: テスト用（呼び出し記録・障害注入つき）
//! - **LocalFsObjectStore**: ディレクトリをストアとして使う

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

/// Blob 名の列挙ストリーム（有限・一度きり）
pub type BlobNameStream = BoxStream<'static, Result<String, StoreError>>;

/// StoreError はストアが返すエラー
///
/// `RequestFailed` はサービスが status 付きで拒否したもの。
/// それ以外は原因の分からない障害として扱います。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{message} (status: {status}, code: {code})")]
    RequestFailed {
        status: u16,
        code: String,
        message: String,
    },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn request_failed(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::RequestFailed {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::request_failed(404, code, message)
    }

    pub fn container_not_found(container: &str) -> Self {
        Self::not_found(
            "ContainerNotFound",
            format!("The specified container '{container}' does not exist."),
        )
    }

    pub fn blob_not_found(name: &str) -> Self {
        Self::not_found(
            "BlobNotFound",
            format!("The specified blob '{name}' does not exist."),
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::RequestFailed { status: 404, .. })
    }
}

/// ObjectStore はコンテナ単位で Blob を保存する外部ストア
///
/// # 設計原則
/// - put は常に全体を上書き
/// - list の順序は実装依存（ソートを保証しない）
/// - 呼び出しは一度に一つだけ発行される前提
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// コンテナを作成（既にあれば何もしない）
    async fn ensure_container(&self, container: &str) -> Result<(), StoreError>;

    async fn put_object(&self, container: &str, name: &str, data: Bytes) -> Result<(), StoreError>;

    async fn list_objects(&self, container: &str) -> Result<BlobNameStream, StoreError>;

    async fn get_object(&self, container: &str, name: &str) -> Result<Bytes, StoreError>;

    async fn object_exists(&self, container: &str, name: &str) -> Result<bool, StoreError>;

    async fn delete_object(&self, container: &str, name: &str) -> Result<(), StoreError>;
}
