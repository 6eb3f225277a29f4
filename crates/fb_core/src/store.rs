use async_trait::async_trait;

use crate::types::{StoryFields, StoryId};
use crate::Result;

/// Document-store operations the story endpoints are built on.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Point lookup by id.
    async fn get(&self, id: &str) -> Result<StoryFields>;

    /// Partial-document update: fields present in `partial` overwrite the
    /// stored ones, everything else is left alone.
    async fn update(&self, id: &str, partial: StoryFields) -> Result<()>;

    /// Full collection scan. All-or-nothing: a failure mid-stream discards
    /// everything collected so far.
    async fn scan_all(&self) -> Result<Vec<(StoryId, StoryFields)>>;

    /// One bounded window of the collection, in store order. `from` is
    /// forwarded as-is; a negative offset is the store's to refuse.
    async fn search_page(&self, from: i64, size: i64) -> Result<Vec<(StoryId, StoryFields)>>;
}
