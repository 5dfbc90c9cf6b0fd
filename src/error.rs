/// Error types for the filter picker
///
/// `FilterError` is what a filter capability reports when it cannot
/// produce an image. `Error` covers misuse of the coordinator and
/// failures in the ambient layers (config, I/O, decoding).

use thiserror::Error;

/// Failure reported by a single filter application
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The input image has zero width or height
    #[error("image has no pixels")]
    EmptyImage,

    /// The filter ran but could not produce an image
    #[error("filter failed: {0}")]
    Failed(String),

    /// The background worker running the filter did not finish
    #[error("worker error: {0}")]
    Worker(String),
}

/// Errors returned by coordinator and host-facing operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("no filter is selected")]
    NoSelection,

    #[error("a confirm is already in progress")]
    ConfirmPending,

    #[error("the filter picker has already been dismissed")]
    Dismissed,

    #[error("no confirm is in progress")]
    NoPendingConfirm,

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
