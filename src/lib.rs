//! Storefront: Static-Generation Data Orchestration
//!
//! Loads the data a storefront page needs from a GraphQL commerce backend
//! through a normalized query cache, decides between a rendered page, a
//! not-found response and a propagated failure, and hands the page props
//! plus a hydration snapshot of the shared cache to the render layer.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod page;
pub mod pages;
pub mod query;
pub mod render;
pub mod types;
