//! LocalFsObjectStore - ディレクトリをオブジェクトストアとして使う
//!
//! レイアウト: `<root>/<container>/<blob>`
//!
//! コンテナはサブディレクトリ、Blob はその直下のファイルです。
//! Blob 名にパス区切りは使えません（400 InvalidResourceName）。

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::fs;

use crate::ports::{BlobNameStream, ObjectStore, StoreError};

#[derive(Debug, Clone)]
pub struct LocalFsObjectStore {
    root: PathBuf,
}

impl LocalFsObjectStore {
    /// `root` が無ければ作成する
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_dir(&self, container: &str) -> Result<PathBuf, StoreError> {
        validate_name("container", container)?;
        Ok(self.root.join(container))
    }

    fn blob_path(&self, container: &str, name: &str) -> Result<PathBuf, StoreError> {
        validate_name("blob", name)?;
        Ok(self.container_dir(container)?.join(name))
    }

    /// ファイルが無いとき、コンテナが無いのか Blob が無いのかを区別する
    async fn missing(&self, container: &str, name: &str) -> StoreError {
        match fs::metadata(self.root.join(container)).await {
            Ok(meta) if meta.is_dir() => StoreError::blob_not_found(name),
            _ => StoreError::container_not_found(container),
        }
    }
}

fn validate_name(what: &str, name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::request_failed(
            400,
            "InvalidResourceName",
            format!("The specified {what} name '{name}' is not valid."),
        ));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for LocalFsObjectStore {
    async fn ensure_container(&self, container: &str) -> Result<(), StoreError> {
        let dir = self.container_dir(container)?;
        fs::create_dir_all(&dir).await?;
        Ok(())
    }

    async fn put_object(&self, container: &str, name: &str, data: Bytes) -> Result<(), StoreError> {
        let path = self.blob_path(container, name)?;
        match fs::metadata(self.container_dir(container)?).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(StoreError::container_not_found(container)),
        }
        fs::write(&path, &data).await?;
        Ok(())
    }

    async fn list_objects(&self, container: &str) -> Result<BlobNameStream, StoreError> {
        let dir = self.container_dir(container)?;
        let entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(StoreError::container_not_found(container));
            }
            Err(e) => return Err(e.into()),
        };

        // エラーを1回返したら終了する
        let stream = futures::stream::unfold(Some(entries), |state| async move {
            let Some(mut entries) = state else {
                return None;
            };
            loop {
                match entries.next_entry().await {
                    Ok(Some(entry)) => {
                        // get/exists と同じくシンボリックリンクを辿る
                        match fs::metadata(entry.path()).await {
                            Ok(meta) if meta.is_file() => {}
                            Ok(_) => continue,
                            Err(e) if e.kind() == IoErrorKind::NotFound => continue,
                            Err(e) => return Some((Err(StoreError::from(e)), None)),
                        }
                        let item = entry.file_name().into_string().map_err(|raw| {
                            StoreError::Other(format!("non UTF-8 blob name: {raw:?}"))
                        });
                        return Some((item, Some(entries)));
                    }
                    Ok(None) => return None,
                    Err(e) => return Some((Err(StoreError::from(e)), None)),
                }
            }
        });
        Ok(stream.boxed())
    }

    async fn get_object(&self, container: &str, name: &str) -> Result<Bytes, StoreError> {
        let path = self.blob_path(container, name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Err(self.missing(container, name).await),
            Err(e) => Err(e.into()),
        }
    }

    async fn object_exists(&self, container: &str, name: &str) -> Result<bool, StoreError> {
        let path = self.blob_path(container, name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_object(&self, container: &str, name: &str) -> Result<(), StoreError> {
        let path = self.blob_path(container, name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Err(self.missing(container, name).await),
            Err(e) => Err(e.into()),
        }
    }
}
