use thiserror::Error;

/// Failures of the route request lifecycle. These never escape the
/// controller; they become the `Error` arm of its request state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing endpoint")]
    MissingEndpoint,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid route response: {0}")]
    InvalidResponse(String),
}

/// Device location failures, surfaced to the caller that asked for the
/// fix. Never retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location unavailable")]
    Unavailable,
}

/// Failures of step focusing. Local to the navigator; prior focus is
/// left intact when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DirectionsError {
    #[error("step {index} is out of range for {len} steps")]
    OutOfRangeStep { index: usize, len: usize },
    #[error("step {index} points at route node {node_index} but the path has {path_len} points")]
    CorruptDirections {
        index: usize,
        node_index: usize,
        path_len: usize,
    },
}
