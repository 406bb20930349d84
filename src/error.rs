//! Error handling for `iter_gauge`.
//!
//! Only construction can fail. Rendering guards its own arithmetic and terminal
//! writes are best-effort, so neither surfaces here.

use thiserror::Error;

/// Errors that can happen when creating a progress indicator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The indicator was configured with an unusable total.
    ///
    /// Returned when the total is zero, which includes wrapping an empty
    /// sequence or requesting `range(0)`.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type alias for fallible `iter_gauge` operations.
pub type Result<T> = std::result::Result<T, Error>;
