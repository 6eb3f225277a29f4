use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Opaque document id assigned by the store.
pub type StoryId = String;

/// Free-form field set of a story document. The ingestion pipeline decides
/// what goes in here; this service only ever touches the vote counters.
pub type StoryFields = Map<String, Value>;

/// The three vote counters carried by every story document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Approved,
    Fake,
    Mixed,
}

impl CounterField {
    /// Field name as stored on the document.
    pub fn as_str(self) -> &'static str {
        match self {
            CounterField::Approved => "approved_count",
            CounterField::Fake => "fake_count",
            CounterField::Mixed => "mixedvote_count",
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the vote endpoints. `change_val` is a signed delta; negative
/// values take the counter down and are not clamped.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteChange {
    pub story_id: String,
    pub change_val: i64,
}
