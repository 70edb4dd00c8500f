//! Page Data Orchestration
//!
//! A page declares the queries it needs ([`PageDefinition`]); the
//! [`PageOrchestrator`] runs them concurrently against a fresh
//! [`crate::client::QueryClientPair`], merges successful results into props,
//! attaches the hydration snapshot and the revalidation interval, and maps
//! failures onto not-found or a propagated [`crate::error::PageError`].

pub mod config;
pub mod definition;
pub mod merge;
pub mod orchestrator;
pub mod outcome;

pub use config::PagesConfig;
pub use definition::{
    FieldClaim, FieldOwnership, PageContext, PageDefinition, PageQuery, Requirement, HYDRATION_KEY,
};
pub use orchestrator::PageOrchestrator;
pub use outcome::{PageOutcome, RenderedPage};
