//! Integration tests for storefront page data orchestration

mod cache_policy;
mod config_integration;
mod hydration;
