use duel_relay::dao::{
    save_store::SaveStore,
    storage::{StorageError, StorageResult},
};
use futures::{FutureExt, future::BoxFuture};
use serde_json::Value;

const BACKEND: &str = "offline";

/// Save store whose backend never answers.
pub struct OfflineSaveStore;

fn refused<T: Send + 'static>(operation: &'static str) -> BoxFuture<'static, StorageResult<T>> {
    async move { Err(StorageError::unavailable(BACKEND, format!("{operation} refused"))) }.boxed()
}

impl SaveStore for OfflineSaveStore {
    fn put(&self, _player_id: String, _blob: Value) -> BoxFuture<'static, StorageResult<()>> {
        refused("put")
    }

    fn get(&self, _player_id: String) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        refused("get")
    }

    fn count(&self) -> BoxFuture<'static, StorageResult<usize>> {
        refused("count")
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        refused("health check")
    }
}
