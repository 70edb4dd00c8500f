//! Query descriptors and the storefront's GraphQL documents.

pub mod descriptor;
pub mod documents;

pub use descriptor::{CachePolicy, QueryDescriptor};
