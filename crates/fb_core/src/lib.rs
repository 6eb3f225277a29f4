pub mod error;
pub mod reader;
pub mod store;
pub mod types;
pub mod votes;

pub use error::Error;
pub use store::StoryStore;
pub use types::{CounterField, StoryFields, StoryId, VoteChange};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::store::StoryStore;
    pub use crate::types::{CounterField, StoryFields, StoryId, VoteChange};
    pub use crate::{Error, Result};
}
