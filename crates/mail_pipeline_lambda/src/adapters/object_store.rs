use async_trait::async_trait;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn retrieve(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String>;
}
