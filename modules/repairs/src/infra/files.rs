//! Local-disk implementation of the upload store.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::FileStore;

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("cannot create {}", self.root.display()))?;

        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(name)
    }
}
