use thiserror::Error;

/// Reasons an image cannot be described, mapped or allocated.
///
/// Drawing steps treat every variant except `AllocationFailed` as a silent
/// skip; only `PaintImage` hands them back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaintError {
    #[error("image has no pixels")]
    InvalidBuffer,
    #[error("image layout could not be described")]
    DescribeFailed,
    #[error("image storage could not be mapped")]
    MapFailed,
    #[error("could not allocate a {width}x{height} image")]
    AllocationFailed { width: i32, height: i32 },
}

/// Failures reported back by the host the session runs in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("mouse lock failed: {0}")]
    Lock(String),
    #[error("flush failed: {0}")]
    Flush(String),
    #[error("could not bind graphics: {0}")]
    Bind(String),
}
