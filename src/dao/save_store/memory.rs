use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::dao::{save_store::SaveStore, storage::StorageResult};

/// Process-local save store. Everything it holds is lost on restart.
#[derive(Clone, Default)]
pub struct InMemorySaveStore {
    saves: Arc<DashMap<String, Value>>,
}

impl InMemorySaveStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for InMemorySaveStore {
    fn put(&self, player_id: String, blob: Value) -> BoxFuture<'static, StorageResult<()>> {
        let saves = self.saves.clone();
        async move {
            saves.insert(player_id, blob);
            Ok(())
        }
        .boxed()
    }

    fn get(&self, player_id: String) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let saves = self.saves.clone();
        async move { Ok(saves.get(&player_id).map(|entry| entry.value().clone())) }.boxed()
    }

    fn count(&self) -> BoxFuture<'static, StorageResult<usize>> {
        let saves = self.saves.clone();
        async move { Ok(saves.len()) }.boxed()
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        async { Ok(()) }.boxed()
    }
}
