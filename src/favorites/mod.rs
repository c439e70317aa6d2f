pub mod storage;
pub mod store;

pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::{FavoritesStore, FAVORITES_KEY};
