//! Ports - 抽象化レイヤー
//!
//! 外部システム（オブジェクトストレージ、時計）へのインターフェースを
//! trait として定義し、実装の詳細を隠蔽します。

pub mod clock;
pub mod object_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::object_store::{BlobNameStream, ObjectStore, StoreError};
