//! InMemoryObjectStore - テスト・開発用のオブジェクトストア
//!
//! # 学習ポイント
//! - tokio::sync::Mutex による非同期な排他制御
//! - 呼び出し記録（どの操作がストアに届いたか）を検証に使う
//! - 操作ごとの障害注入（fail_next）

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::Mutex;

use crate::ports::{BlobNameStream, ObjectStore, StoreError};

/// ストアへの操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    EnsureContainer,
    Put,
    List,
    Get,
    Exists,
    Delete,
}

/// 記録された1回の呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub container: String,
    pub name: Option<String>,
}

/// 注入された障害（container が None なら全コンテナが対象）
struct Fault {
    op: StoreOp,
    container: Option<String>,
    err: StoreError,
}

#[derive(Default)]
struct InMemoryState {
    /// container -> (blob name -> bytes)
    containers: HashMap<String, BTreeMap<String, Bytes>>,
    calls: Vec<StoreCall>,
    faults: VecDeque<Fault>,
}

impl InMemoryState {
    /// 呼び出しを記録し、注入された障害があればそれを返す
    fn enter(&mut self, op: StoreOp, container: &str, name: Option<&str>) -> Result<(), StoreError> {
        self.calls.push(StoreCall {
            op,
            container: container.to_string(),
            name: name.map(str::to_string),
        });
        let hit = self.faults.iter().position(|f| {
            f.op == op && f.container.as_deref().is_none_or(|c| c == container)
        });
        match hit.and_then(|i| self.faults.remove(i)) {
            Some(fault) => Err(fault.err),
            None => Ok(()),
        }
    }

    fn container(&self, container: &str) -> Result<&BTreeMap<String, Bytes>, StoreError> {
        self.containers
            .get(container)
            .ok_or_else(|| StoreError::container_not_found(container))
    }

    fn container_mut(
        &mut self,
        container: &str,
    ) -> Result<&mut BTreeMap<String, Bytes>, StoreError> {
        self.containers
            .get_mut(container)
            .ok_or_else(|| StoreError::container_not_found(container))
    }
}

/// InMemoryObjectStore はプロセス内に Blob を保持するストア
///
/// # 使用例
/// ```ignore
/// let store = InMemoryObjectStore::new();
/// store.fail_next(StoreOp::Put, StoreError::Other("disk on fire".into())).await;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 次の `op` 呼び出しを `err` で失敗させる（複数回呼べば順に消費）
    pub async fn fail_next(&self, op: StoreOp, err: StoreError) {
        self.push_fault(op, None, err).await;
    }

    /// `container` に対する次の `op` 呼び出しだけを失敗させる
    pub async fn fail_next_in(&self, container: &str, op: StoreOp, err: StoreError) {
        self.push_fault(op, Some(container.to_string()), err).await;
    }

    async fn push_fault(&self, op: StoreOp, container: Option<String>, err: StoreError) {
        let mut state = self.state.lock().await;
        state.faults.push_back(Fault { op, container, err });
    }

    /// これまでの全呼び出し
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    /// `op` の呼び出しだけ
    pub async fn calls_of(&self, op: StoreOp) -> Vec<StoreCall> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// 呼び出し記録を残さずに中身を覗く
    pub async fn peek(&self, container: &str, name: &str) -> Option<Bytes> {
        let state = self.state.lock().await;
        state.containers.get(container)?.get(name).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn ensure_container(&self, container: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::EnsureContainer, container, None)?;
        state.containers.entry(container.to_string()).or_default();
        Ok(())
    }

    async fn put_object(&self, container: &str, name: &str, data: Bytes) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::Put, container, Some(name))?;
        state.container_mut(container)?.insert(name.to_string(), data);
        Ok(())
    }

    async fn list_objects(&self, container: &str) -> Result<BlobNameStream, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::List, container, None)?;
        let names: Vec<String> = state.container(container)?.keys().cloned().collect();
        Ok(futures::stream::iter(names.into_iter().map(Ok)).boxed())
    }

    async fn get_object(&self, container: &str, name: &str) -> Result<Bytes, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::Get, container, Some(name))?;
        state
            .container(container)?
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::blob_not_found(name))
    }

    async fn object_exists(&self, container: &str, name: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::Exists, container, Some(name))?;
        Ok(state
            .containers
            .get(container)
            .is_some_and(|blobs| blobs.contains_key(name)))
    }

    async fn delete_object(&self, container: &str, name: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.enter(StoreOp::Delete, container, Some(name))?;
        state
            .container_mut(container)?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::blob_not_found(name))
    }
}
