//! Query result cache: normalized store, snapshots, settings.

pub mod config;
pub mod normalize;
pub mod snapshot;
pub mod store;

pub use config::CacheConfig;
pub use snapshot::CacheSnapshot;
pub use store::{CacheLookup, CacheStore};
