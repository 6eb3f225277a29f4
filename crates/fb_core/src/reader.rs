use serde_json::{Map, Value};

use crate::store::StoryStore;
use crate::Result;

/// Every story in the collection, keyed by id. The id stays outside the
/// field set; `fetch_page` is the one that embeds it.
pub async fn fetch_all(store: &dyn StoryStore) -> Result<Map<String, Value>> {
    let mut stories = Map::new();
    for (id, fields) in store.scan_all().await? {
        stories.insert(id, Value::Object(fields));
    }
    Ok(stories)
}

/// One page of stories in store order, each field set augmented with its
/// own id under `_id`. Pages are 1-indexed; `page` is not validated here,
/// a negative offset is forwarded for the store to refuse.
pub async fn fetch_page(store: &dyn StoryStore, page: i64, page_size: i64) -> Result<Vec<Value>> {
    let from = (page - 1) * page_size;

    let hits = store.search_page(from, page_size).await?;

    let mut stories = Vec::with_capacity(hits.len());
    for (id, mut fields) in hits {
        fields.insert("_id".to_string(), Value::String(id));
        stories.push(Value::Object(fields));
    }
    Ok(stories)
}
