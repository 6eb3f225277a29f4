use async_trait::async_trait;
use fb_core::Result;

pub mod backends;

pub use backends::*;

/// Constructor contract shared by the storage backends.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Printed when the backend cannot be reached at startup.
    fn unavailable_hint() -> &'static str;

    /// Build a backend from its environment-driven configuration.
    async fn connect() -> Result<Self>
    where
        Self: Sized;
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::StorageBackend;
}
