use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier returned by query submission; needed to poll and to cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHandle(String);

impl QueryHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by the query service for an in-flight query.
///
/// `Scheduled` and `Running` are the only non-terminal states. Anything the
/// service reports outside the known set is preserved verbatim in `Other`
/// so the error message can carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Scheduled,
    Running,
    Complete,
    Failed,
    Other(String),
}

impl QueryStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Scheduled" => QueryStatus::Scheduled,
            "Running" => QueryStatus::Running,
            "Complete" => QueryStatus::Complete,
            "Failed" => QueryStatus::Failed,
            other => QueryStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStatus::Scheduled => f.write_str("Scheduled"),
            QueryStatus::Running => f.write_str("Running"),
            QueryStatus::Complete => f.write_str("Complete"),
            QueryStatus::Failed => f.write_str("Failed"),
            QueryStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Statistics snapshot attached to a poll response. Only the last snapshot
/// observed during a query's lifetime is retained and reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryStats {
    pub records_matched: f64,
    pub records_scanned: f64,
    pub bytes_scanned: f64,
}

/// One output field of a matched record, as `{field, value}` string pairs at
/// the protocol boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultField {
    pub field: String,
    pub value: String,
}

impl ResultField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// One matched record: an ordered list of output fields.
pub type ResultRow = Vec<ResultField>;

/// One page of completed rows, emitted in service order.
pub type ResultPage = Vec<ResultRow>;

/// Everything one poll of the query service returns.
#[derive(Debug, Clone)]
pub struct PollResponse {
    pub status: QueryStatus,
    pub statistics: Option<QueryStats>,
    /// Result pages; populated only once the service reports `Complete`.
    pub pages: Vec<ResultPage>,
}

impl PollResponse {
    /// A bare status report with no statistics and no rows.
    pub fn status_only(status: QueryStatus) -> Self {
        Self {
            status,
            statistics: None,
            pages: Vec::new(),
        }
    }
}
