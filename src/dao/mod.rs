/// Player save storage backends.
pub mod save_store;
/// Storage error types shared by every backend.
pub mod storage;
