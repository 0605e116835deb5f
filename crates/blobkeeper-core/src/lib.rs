//! blobkeeper-core
//!
//! Core building blocks for the blobkeeper console.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（LogRecord, Action, GatewayError, ErrorKind）
//! - **ports**: 抽象化レイヤー（ObjectStore, Clock）
//! - **impls**: 実装（InMemoryObjectStore, LocalFsObjectStore）
//! - **app**: アプリケーションロジック（StorageGateway, OperationLogger, BlobService）

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;
