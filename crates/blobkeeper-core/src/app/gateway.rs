//! StorageGateway - ObjectStore に対する upload/list/download/delete
//!
//! ゲートウェイはストアのハンドル以外に状態を持ちません。
//! コンテナ名は呼び出しごとに渡します。

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::fs;
use tracing::debug;

use crate::domain::GatewayError;
use crate::ports::ObjectStore;

/// list の結果（遅延・有限・一度きり）
pub type GatewayNameStream = BoxStream<'static, Result<String, GatewayError>>;

#[derive(Clone)]
pub struct StorageGateway {
    store: Arc<dyn ObjectStore>,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// コンテナを（無ければ）作成し、`source` の中身で `blob` を上書きする
    pub async fn upload(
        &self,
        container: &str,
        source: &Path,
        blob: &str,
    ) -> Result<(), GatewayError> {
        self.store.ensure_container(container).await?;
        let data = fs::read(source)
            .await
            .map_err(|e| GatewayError::io(source, e))?;
        debug!(container, blob, bytes = data.len(), "put_object");
        self.store
            .put_object(container, blob, Bytes::from(data))
            .await?;
        Ok(())
    }

    /// コンテナ内の Blob 名を列挙する
    ///
    /// 順序はストアの列挙順のまま。列挙開始に失敗した場合は
    /// そのエラーを1件だけ流すストリームを返します。
    pub async fn list(&self, container: &str) -> GatewayNameStream {
        debug!(container, "list_objects");
        match self.store.list_objects(container).await {
            Ok(names) => names.map(|item| item.map_err(GatewayError::from)).boxed(),
            Err(err) => futures::stream::once(async move { Err(GatewayError::from(err)) }).boxed(),
        }
    }

    /// `blob` を `dest` に保存する
    ///
    /// `overwrite` が false で `dest` が既にあるときは、ストアに触れずに
    /// `DestinationExists` を返します。
    pub async fn download(
        &self,
        container: &str,
        blob: &str,
        dest: &Path,
        overwrite: bool,
    ) -> Result<(), GatewayError> {
        if !overwrite {
            let exists = fs::try_exists(dest)
                .await
                .map_err(|e| GatewayError::io(dest, e))?;
            if exists {
                return Err(GatewayError::DestinationExists(dest.to_path_buf()));
            }
        }

        debug!(container, blob, "get_object");
        let data = self.store.get_object(container, blob).await?;
        fs::write(dest, &data)
            .await
            .map_err(|e| GatewayError::io(dest, e))?;
        Ok(())
    }

    /// 存在確認してから削除する
    ///
    /// 確認と削除の間に状態が変わる可能性は許容します。
    pub async fn delete(&self, container: &str, blob: &str) -> Result<(), GatewayError> {
        if !self.store.object_exists(container, blob).await? {
            return Err(GatewayError::BlobNotFound(blob.to_string()));
        }
        debug!(container, blob, "delete_object");
        self.store.delete_object(container, blob).await?;
        Ok(())
    }
}
