use std::fmt;

/// Result type for logsleuth-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during traversal and aggregation
#[derive(Debug)]
pub enum Error {
    /// Segment document failed to parse as JSON
    Json(serde_json::Error),

    /// Path expression itself failed to parse
    Path { path: String, message: String },

    /// Path matched a node of the wrong type
    Type {
        path: String,
        expected: &'static str,
    },

    /// Trace store fetch failed
    Store(anyhow::Error),

    /// Log-delivery probe failed for a reason other than not-found
    Probe(anyhow::Error),

    /// No segment in the traversal carried a usable start/end time
    EmptyWindow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(err) => write!(f, "segment document parse error: {}", err),
            Error::Path { path, message } => write!(f, "path query {}: {}", path, message),
            Error::Type { path, expected } => {
                write!(f, "path query {}: matched node is not a {}", path, expected)
            }
            Error::Store(err) => write!(f, "trace store: {:#}", err),
            Error::Probe(err) => write!(f, "log delivery probe: {:#}", err),
            Error::EmptyWindow => {
                f.write_str("trace segments carried no usable start/end time window")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::Store(err) | Error::Probe(err) => Some(&**err),
            Error::Path { .. } | Error::Type { .. } | Error::EmptyWindow => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
