use async_trait::async_trait;
use fb_core::types::{StoryFields, StoryId};
use fb_core::{Error, Result, StoryStore};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::StorageBackend;

/// Insertion-ordered story collection. Pagination windows follow insertion
/// order.
pub struct MemoryStore {
    stories: Vec<(StoryId, StoryFields)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            stories: Vec::new(),
        }
    }

    fn insert(&mut self, id: StoryId, fields: StoryFields) {
        if let Some((_, existing)) = self.stories.iter_mut().find(|(i, _)| *i == id) {
            *existing = fields;
        } else {
            self.stories.push((id, fields));
        }
    }

    fn get(&self, id: &str) -> Result<StoryFields> {
        self.stories
            .iter()
            .find(|(i, _)| i == id)
            .map(|(_, fields)| fields.clone())
            .ok_or_else(|| Error::NotFound(format!("no story with id [{id}]")))
    }

    fn update(&mut self, id: &str, partial: StoryFields) -> Result<()> {
        let fields = self
            .stories
            .iter_mut()
            .find(|(i, _)| i == id)
            .map(|(_, fields)| fields)
            .ok_or_else(|| Error::NotFound(format!("no story with id [{id}]")))?;

        for (key, value) in partial {
            fields.insert(key, value);
        }
        Ok(())
    }

    fn scan_all(&self) -> Vec<(StoryId, StoryFields)> {
        self.stories.clone()
    }

    fn search_page(&self, from: i64, size: i64) -> Result<Vec<(StoryId, StoryFields)>> {
        // Same refusal Elasticsearch gives for a negative window.
        if from < 0 {
            return Err(Error::Store(format!(
                "[from] parameter cannot be negative, found [{from}]"
            )));
        }
        if size < 0 {
            return Err(Error::Store(format!(
                "[size] parameter cannot be negative, found [{size}]"
            )));
        }

        Ok(self
            .stories
            .iter()
            .skip(from as usize)
            .take(size as usize)
            .cloned()
            .collect())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Default backend: the collection lives in process memory. The lock is
/// taken once per store call, so a vote's get and update run under separate
/// acquisitions.
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        })
    }

    /// Seed one story. Ingestion runs outside the HTTP surface, so this is
    /// an inherent method, not part of [`StoryStore`].
    pub async fn insert(&self, id: StoryId, fields: StoryFields) {
        let mut store = self.store.write().await;
        store.insert(id, fields);
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn unavailable_hint() -> &'static str {
        "memory storage should always be available"
    }

    async fn connect() -> Result<Self>
    where
        Self: Sized,
    {
        Self::new().await
    }
}

#[async_trait]
impl StoryStore for MemoryStorage {
    async fn get(&self, id: &str) -> Result<StoryFields> {
        let store = self.store.read().await;
        store.get(id)
    }

    async fn update(&self, id: &str, partial: StoryFields) -> Result<()> {
        let mut store = self.store.write().await;
        store.update(id, partial)
    }

    async fn scan_all(&self) -> Result<Vec<(StoryId, StoryFields)>> {
        let store = self.store.read().await;
        Ok(store.scan_all())
    }

    async fn search_page(&self, from: i64, size: i64) -> Result<Vec<(StoryId, StoryFields)>> {
        let store = self.store.read().await;
        store.search_page(from, size)
    }
}
