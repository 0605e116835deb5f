//! App - アプリケーション層
//!
//! ports を組み合わせて、コンソールから使う操作を実装します。
//!
//! # 主要コンポーネント
//! - **StorageGateway**: ObjectStore に対する upload/list/download/delete
//! - **OperationLogger**: 日付ごとの log blob への記録
//! - **BlobService**: 上の2つをまとめ、結果を OperationReport にする
//! - **ServiceConfig**: コンテナ名・ログモードなどの設定

pub mod config;
pub mod gateway;
pub mod op_logger;
pub mod service;

pub use self::config::{LogMode, ParseLogModeError, ServiceConfig};
pub use self::gateway::{GatewayNameStream, StorageGateway};
pub use self::op_logger::OperationLogger;
pub use self::service::{BlobService, OperationReport, ReportKind};
