mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

/// Durable string storage keyed by a fixed name, the way a browser's local storage is used
/// for the credential token.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn del(&self, key: &str) -> Result<(), StorageError>;
}
