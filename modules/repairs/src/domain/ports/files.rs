use async_trait::async_trait;

/// Output port for persisting uploaded bytes.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` under a fresh name with the given extension and return
    /// that name.
    async fn save(&self, extension: &str, bytes: &[u8]) -> anyhow::Result<String>;
}
