/// Process-local backend.
pub mod memory;

use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use serde_json::Value;

pub use self::memory::InMemorySaveStore;

/// Abstraction over the place player save blobs are kept.
pub trait SaveStore: Send + Sync {
    /// Overwrite the blob stored for `player_id`.
    fn put(&self, player_id: String, blob: Value) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch the blob last stored for `player_id`, if any.
    fn get(&self, player_id: String) -> BoxFuture<'static, StorageResult<Option<Value>>>;
    /// Number of players with a stored blob.
    fn count(&self) -> BoxFuture<'static, StorageResult<usize>>;
    /// Confirm the backend can serve requests.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
