use serde_json::Value;

use crate::store::StoryStore;
use crate::types::{CounterField, StoryFields};
use crate::{Error, Result};

/// Read-increment-write on one counter of one story.
///
/// The get and the update are two separate store calls, so concurrent
/// deltas on the same story and field can lose increments: last write wins
/// on the read snapshot. Closing that race needs the store's conditional
/// update (`if_seq_no`/`if_primary_term` on Elasticsearch), not a lock here.
pub async fn apply_vote_delta(
    store: &dyn StoryStore,
    story_id: &str,
    field: CounterField,
    delta: i64,
) -> Result<()> {
    // Any fetch failure answers as not-found, the same way an unknown id
    // does; the underlying error text travels with it.
    let doc = store
        .get(story_id)
        .await
        .map_err(|e| Error::NotFound(e.to_string()))?;

    let current = doc
        .get(field.as_str())
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::NotFound(format!("story {story_id} has no {field} field")))?;

    let mut partial = StoryFields::new();
    partial.insert(field.as_str().to_string(), Value::from(current + delta));

    // No clamp on the new value; a delta past zero leaves a negative count.
    store
        .update(story_id, partial)
        .await
        .map_err(|e| Error::Store(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedStore {
        docs: Mutex<HashMap<String, StoryFields>>,
        fail_updates: bool,
    }

    impl FixedStore {
        fn with_story(id: &str, fields: Value) -> Self {
            let mut docs = HashMap::new();
            docs.insert(id.to_string(), fields.as_object().unwrap().clone());
            Self {
                docs: Mutex::new(docs),
                fail_updates: false,
            }
        }

        fn counter(&self, id: &str, field: CounterField) -> Option<i64> {
            let docs = self.docs.lock().unwrap();
            docs.get(id)?.get(field.as_str())?.as_i64()
        }
    }

    #[async_trait]
    impl StoryStore for FixedStore {
        async fn get(&self, id: &str) -> Result<StoryFields> {
            let docs = self.docs.lock().unwrap();
            docs.get(id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("no story with id {id}")))
        }

        async fn update(&self, id: &str, partial: StoryFields) -> Result<()> {
            if self.fail_updates {
                return Err(Error::Store("connection reset by peer".to_string()));
            }
            let mut docs = self.docs.lock().unwrap();
            let doc = docs
                .get_mut(id)
                .ok_or_else(|| Error::NotFound(format!("no story with id {id}")))?;
            for (key, value) in partial {
                doc.insert(key, value);
            }
            Ok(())
        }

        async fn scan_all(&self) -> Result<Vec<(String, StoryFields)>> {
            let docs = self.docs.lock().unwrap();
            Ok(docs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        }

        async fn search_page(&self, _from: i64, _size: i64) -> Result<Vec<(String, StoryFields)>> {
            self.scan_all().await
        }
    }

    fn story() -> Value {
        json!({
            "title": "Moon landing re-enacted",
            "approved_count": 4,
            "fake_count": 3,
            "mixedvote_count": 0,
        })
    }

    #[tokio::test]
    async fn delta_lands_on_the_named_counter() {
        let store = FixedStore::with_story("s1", story());

        apply_vote_delta(&store, "s1", CounterField::Approved, 2)
            .await
            .unwrap();

        assert_eq!(store.counter("s1", CounterField::Approved), Some(6));
        assert_eq!(store.counter("s1", CounterField::Fake), Some(3));
        assert_eq!(store.counter("s1", CounterField::Mixed), Some(0));
    }

    #[tokio::test]
    async fn negative_delta_takes_the_counter_down() {
        let store = FixedStore::with_story("s1", story());

        apply_vote_delta(&store, "s1", CounterField::Fake, -1)
            .await
            .unwrap();

        assert_eq!(store.counter("s1", CounterField::Fake), Some(2));
    }

    #[tokio::test]
    async fn counter_may_go_below_zero() {
        let store = FixedStore::with_story("s1", story());

        apply_vote_delta(&store, "s1", CounterField::Mixed, -5)
            .await
            .unwrap();

        assert_eq!(store.counter("s1", CounterField::Mixed), Some(-5));
    }

    #[tokio::test]
    async fn unknown_story_is_not_found_and_writes_nothing() {
        let store = FixedStore::with_story("s1", story());

        let err = apply_vote_delta(&store, "ghost", CounterField::Approved, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.counter("s1", CounterField::Approved), Some(4));
    }

    #[tokio::test]
    async fn missing_counter_field_is_not_found() {
        let store = FixedStore::with_story("s1", json!({"title": "no counters yet"}));

        let err = apply_vote_delta(&store, "s1", CounterField::Approved, 1)
            .await
            .unwrap_err();

        match err {
            Error::NotFound(message) => assert!(message.contains("approved_count")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_update_is_a_store_error() {
        let mut store = FixedStore::with_story("s1", story());
        store.fail_updates = true;

        let err = apply_vote_delta(&store, "s1", CounterField::Approved, 1)
            .await
            .unwrap_err();

        match err {
            Error::Store(message) => assert!(message.contains("connection reset")),
            other => panic!("expected Store, got {other:?}"),
        }
    }
}
