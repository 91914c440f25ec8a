//! Shared utilities and types for the FileDeck client crates

// Re-export common dependencies
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tracing;

pub mod observability;
pub mod types;

pub use types::{
    ApiResponse, CommonError, PageEnvelope, PageRequest, PageResponse, PaginationInfo, Result,
    DEFAULT_PAGE_LIMIT, FIRST_PAGE,
};
