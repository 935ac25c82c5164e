use chrono::{DateTime, Utc};

/// Finalized output of one trace traversal: everything needed to seed a log
/// query covering the request's whole execution.
///
/// Produced once by the aggregator and never mutated afterwards. The id
/// lists are sorted and deduplicated; the window is padded by one second on
/// each side to compensate for clock skew and truncation in the recorded
/// segment timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct LogInfo {
    pub trace_ids: Vec<String>,
    pub request_ids: Vec<String>,
    pub log_groups: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
