use std::fmt;

/// Result type for logsleuth-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the query lifecycle
#[derive(Debug)]
pub enum Error {
    /// Transport-level failure talking to the query service
    Service(anyhow::Error),

    /// The service itself reported the query as failed
    QueryFailed(String),

    /// The service reported a status outside the known set
    UnexpectedStatus(String),

    /// Caller-initiated cancellation (signal or deadline)
    Cancelled,

    /// A bounded backoff policy ran out of attempts
    BackoffExhausted,

    /// Writing to the result or stats sink failed
    Io(std::io::Error),

    /// Encoding a row or statistics snapshot failed
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Service(err) => write!(f, "query service: {:#}", err),
            Error::QueryFailed(status) => write!(f, "query failed: status={}", status),
            Error::UnexpectedStatus(status) => write!(f, "unexpected status={}", status),
            Error::Cancelled => f.write_str("cancelled"),
            Error::BackoffExhausted => f.write_str("backoff policy exhausted"),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Service(err) => Some(&**err),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::QueryFailed(_)
            | Error::UnexpectedStatus(_)
            | Error::Cancelled
            | Error::BackoffExhausted => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
