//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryObjectStore**: テスト・開発用（呼び出し記録と障害注入）
//! - **LocalFsObjectStore**: ローカルディレクトリを使うストア
//!
//! クラウドの Blob サービス向け実装は別クレートに置く想定です。

pub mod inmem_store;
pub mod local_fs_store;

pub use self::inmem_store::{InMemoryObjectStore, StoreCall, StoreOp};
pub use self::local_fs_store::LocalFsObjectStore;
