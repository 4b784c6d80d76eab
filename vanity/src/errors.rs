use thiserror::Error;

/// Result type alias for vanity resolver operations
pub type Result<T, E = VanityError> = std::result::Result<T, E>;

/// Errors that can occur while resolving a vanity import request
#[derive(Error, Debug)]
pub enum VanityError {
    /// The backing key-value store could not be reached, timed out, or
    /// returned an unusable reply. Not retried at this layer.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A key present in the listing had no value by the time it was
    /// fetched.
    #[error("key not present in store: {0}")]
    KeyNotFound(String),

    /// The package is registered but its stored value has no usable
    /// source. Distinct from an unknown package.
    #[error("record for {0} has no usable source")]
    InvalidRecord(String),

    #[error("failed to build response: {0}")]
    ResponseBuild(#[from] http::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
