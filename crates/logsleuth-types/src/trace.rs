/// One fetched distributed-trace record, as returned by the trace store.
///
/// A trace is a bag of segments; each segment optionally carries an
/// independently-encoded JSON document with timing and metadata. The walker
/// never interprets segments without a document.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceDocument {
    pub id: String,
    pub segments: Vec<Segment>,
}

/// One component execution within a trace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    pub id: Option<String>,
    /// Raw JSON document payload. `None` for summary-only segments.
    pub document: Option<String>,
}

impl Segment {
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            id: None,
            document: Some(document.into()),
        }
    }
}

/// An API Gateway identity discovered during traversal: the REST API id plus
/// the deployment stage recorded alongside it in the segment document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RestApi {
    pub rest_api_id: String,
    pub stage: String,
}

impl RestApi {
    pub fn new(rest_api_id: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            rest_api_id: rest_api_id.into(),
            stage: stage.into(),
        }
    }

    /// Name of the execution log group API Gateway writes access logs to
    /// when log delivery is enabled for this API + stage.
    pub fn execution_log_group(&self) -> String {
        format!(
            "API-Gateway-Execution-Logs_{}/{}",
            self.rest_api_id, self.stage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_log_group_name() {
        let api = RestApi::new("a1b2c3", "prod");
        assert_eq!(
            api.execution_log_group(),
            "API-Gateway-Execution-Logs_a1b2c3/prod"
        );
    }
}
