//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to a string for CLI output, prefixed with the failure kind
/// when a query failure caused it.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Page(page_error) => match page_error.query_error() {
            Some(query_error) => format!("[{}] {}", query_error.kind(), e),
            None => e.to_string(),
        },
        ApiError::Query(query_error) => format!("[{}] {}", query_error.kind(), e),
        _ => e.to_string(),
    }
}
