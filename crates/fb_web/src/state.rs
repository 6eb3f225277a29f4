use std::sync::Arc;

use fb_core::StoryStore;

/// Shared request context, read-only after startup.
pub struct AppState {
    pub store: Arc<dyn StoryStore>,
    /// Stories per page for `/stories/page/:page`.
    pub page_size: i64,
}
