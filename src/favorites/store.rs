use tracing::{info, warn};

use super::storage::KeyValueStore;
use crate::error::StorageError;

/// Storage key holding the JSON array of favorite movie ids.
pub const FAVORITES_KEY: &str = "movieFavorites";

/// The user's favorite movie ids, flushed to storage after every mutation.
///
/// Ids are unique. They are kept in insertion order so the persisted array
/// is stable, but only membership is meaningful.
pub struct FavoritesStore<S: KeyValueStore> {
    backend: S,
    ids: Vec<i64>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Read favorites from `backend`. Absent, unreadable or malformed
    /// content yields an empty set.
    pub fn load(backend: S) -> Self {
        let ids = match backend.get(FAVORITES_KEY) {
            Ok(Some(raw)) => parse_ids(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites, starting empty: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} favorites", ids.len());
        Self { backend, ids }
    }

    /// Add `id` if absent, remove it if present. Returns whether `id` is a
    /// favorite afterwards.
    pub fn toggle(&mut self, id: i64) -> Result<bool, StorageError> {
        let mut next = self.ids.clone();
        let now_favorite = if let Some(pos) = next.iter().position(|&x| x == id) {
            next.remove(pos);
            false
        } else {
            next.push(id);
            true
        };

        self.commit(next)?;
        info!(
            "{} favorite {}",
            if now_favorite { "Added" } else { "Removed" },
            id
        );
        Ok(now_favorite)
    }

    /// Remove `id`. Absent ids are not an error.
    pub fn remove(&mut self, id: i64) -> Result<(), StorageError> {
        if !self.contains(id) {
            return Ok(());
        }
        let next: Vec<i64> = self.ids.iter().copied().filter(|&x| x != id).collect();
        self.commit(next)?;
        info!("Removed favorite {}", id);
        Ok(())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Snapshot in persisted order.
    pub fn ids(&self) -> Vec<i64> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    // Memory only changes once the write has succeeded.
    fn commit(&mut self, next: Vec<i64>) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(&next).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.backend.set(FAVORITES_KEY, &json)?;
        self.ids = next;
        Ok(())
    }
}

fn parse_ids(raw: &str) -> Vec<i64> {
    match serde_json::from_str::<Vec<i64>>(raw) {
        Ok(parsed) => {
            let mut ids = Vec::with_capacity(parsed.len());
            for id in parsed {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            ids
        }
        Err(e) => {
            warn!("Stored favorites are malformed, treating as empty: {}", e);
            Vec::new()
        }
    }
}
