use thiserror::Error;

/// Unified error type for parking session operations
#[derive(Error, Debug)]
pub enum ParkError {
    #[error("a session for plate '{plate}' is already inside the parking lot")]
    DuplicateEntry { plate: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("session for plate '{plate}' has already exited")]
    AlreadyExited { plate: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("page and limit must be positive")]
    InvalidPagination,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("storage failure: {0}")]
    Store(String),
}

pub type ParkResult<T> = Result<T, ParkError>;
