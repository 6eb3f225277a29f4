use async_trait::async_trait;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::Transport;
use elasticsearch::http::StatusCode;
use elasticsearch::{
    ClearScrollParts, Elasticsearch, GetParts, ScrollParts, SearchParts, UpdateParts,
};
use fb_core::types::{StoryFields, StoryId};
use fb_core::{Error, Result, StoryStore};
use serde_json::{json, Value};
use std::env;
use tracing::debug;

use crate::StorageBackend;

/// Documents per scroll batch during a full scan.
const SCROLL_BATCH: i64 = 500;
const SCROLL_KEEPALIVE: &str = "1m";

#[derive(Debug, Clone)]
pub struct ElasticConfig {
    pub url: String,
    pub index: String,
}

impl ElasticConfig {
    pub fn new() -> Self {
        let host = env::var("ELASTICSEARCH_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("ELASTICSEARCH_PORT").unwrap_or_else(|_| "9200".to_string());
        Self {
            url: format!("http://{}:{}", host, port),
            index: env::var("ELASTICSEARCH_INDEX").unwrap_or_else(|_| "factbounty".to_string()),
        }
    }
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Story collection held in an Elasticsearch index. One index, one document
/// per story; ingestion writes the documents, this backend reads them and
/// patches vote counters.
pub struct ElasticStorage {
    client: Elasticsearch,
    index: String,
}

impl ElasticStorage {
    pub fn with_config(config: &ElasticConfig) -> Result<Self> {
        let transport =
            Transport::single_node(&config.url).map_err(|e| Error::Store(e.to_string()))?;
        Ok(Self {
            client: Elasticsearch::new(transport),
            index: config.index.clone(),
        })
    }

    /// Body of a successful response; the raw response text of a failed one.
    async fn read_json(response: Response) -> Result<Value> {
        let status = response.status_code();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| Error::Store(e.to_string()))?;
            return Err(Error::Store(text));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Store(e.to_string()))
    }
}

fn collect_hits(body: &Value) -> Vec<(StoryId, StoryFields)> {
    body["hits"]["hits"]
        .as_array()
        .map(|hits| hits.iter().filter_map(hit_entry).collect())
        .unwrap_or_default()
}

// A hit without an id or _source is skipped, not a failed page.
fn hit_entry(hit: &Value) -> Option<(StoryId, StoryFields)> {
    let id = hit.get("_id")?.as_str()?.to_string();
    let fields = hit.get("_source")?.as_object()?.clone();
    Some((id, fields))
}

#[async_trait]
impl StorageBackend for ElasticStorage {
    fn unavailable_hint() -> &'static str {
        "Elasticsearch should be reachable on http://localhost:9200"
    }

    async fn connect() -> Result<Self>
    where
        Self: Sized,
    {
        Self::with_config(&ElasticConfig::new())
    }
}

#[async_trait]
impl StoryStore for ElasticStorage {
    async fn get(&self, id: &str) -> Result<StoryFields> {
        let response = self
            .client
            .get(GetParts::IndexId(self.index.as_str(), id))
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!(
                "no story with id [{id}] in index [{}]",
                self.index
            )));
        }

        let body = Self::read_json(response).await?;
        body.get("_source")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| Error::Store(format!("document [{id}] came back without _source")))
    }

    async fn update(&self, id: &str, partial: StoryFields) -> Result<()> {
        let response = self
            .client
            .update(UpdateParts::IndexId(self.index.as_str(), id))
            .body(json!({ "doc": partial }))
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!(
                "no story with id [{id}] in index [{}]",
                self.index
            )));
        }
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| Error::Store(e.to_string()))?;
            return Err(Error::Store(text));
        }
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<(StoryId, StoryFields)>> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .scroll(SCROLL_KEEPALIVE)
            .body(json!({
                "query": { "match_all": {} },
                "size": SCROLL_BATCH,
            }))
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;
        let mut body = Self::read_json(response).await?;

        let mut stories = Vec::new();
        loop {
            let batch = collect_hits(&body);
            let exhausted = body["hits"]["hits"]
                .as_array()
                .map_or(true, |hits| hits.is_empty());
            stories.extend(batch);
            if exhausted {
                break;
            }

            let scroll_id = body["_scroll_id"]
                .as_str()
                .ok_or_else(|| Error::Store("scroll response missing _scroll_id".to_string()))?
                .to_string();

            let response = self
                .client
                .scroll(ScrollParts::ScrollId(&scroll_id))
                .scroll(SCROLL_KEEPALIVE)
                .send()
                .await
                .map_err(|e| Error::Store(e.to_string()))?;
            body = Self::read_json(response).await?;
        }

        // Scroll contexts expire on their own; a failed release is not a
        // request failure.
        if let Some(scroll_id) = body["_scroll_id"].as_str() {
            if let Err(e) = self
                .client
                .clear_scroll(ClearScrollParts::ScrollId(&[scroll_id]))
                .send()
                .await
            {
                debug!("failed to release scroll context: {e}");
            }
        }

        Ok(stories)
    }

    async fn search_page(&self, from: i64, size: i64) -> Result<Vec<(StoryId, StoryFields)>> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(json!({
                "query": { "match_all": {} },
                "from": from,
                "size": size,
            }))
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        let body = Self::read_json(response).await?;
        Ok(collect_hits(&body))
    }
}
