//! Observability utilities for logging
//!
//! Provides centralized logging setup for the library and the CLI

pub mod logging;

pub use logging::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Logging setup error: {0}")]
    Logging(String),

    #[error("Unknown log setting: {0}")]
    UnknownSetting(String),
}

pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
