pub mod memory;

#[cfg(feature = "elasticsearch")]
pub mod elastic;

pub use memory::MemoryStorage;

#[cfg(feature = "elasticsearch")]
pub use elastic::ElasticStorage;
