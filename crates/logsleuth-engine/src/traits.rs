use anyhow::Result;
use async_trait::async_trait;
use logsleuth_types::TraceDocument;

/// Read access to the backing trace store.
///
/// Responsibilities:
/// - Fetch the full document batch for one trace id
/// - Treat "no such trace" as an empty batch, not an error
/// - Surface transport/auth failures as errors
#[async_trait]
pub trait TraceStore: Send + Sync {
    /// Fetch every trace document recorded under `trace_id`. An unknown id
    /// returns an empty vec; any error is a hard failure for the traversal.
    async fn batch_get(&self, trace_id: &str) -> Result<Vec<TraceDocument>>;
}

/// Probe for whether a log group has log delivery configured.
#[async_trait]
pub trait DeliveryProbe: Send + Sync {
    /// `Ok(true)` when the group exists, `Ok(false)` for the service's
    /// specific not-found answer (benign: API Gateway access logging is
    /// commonly disabled). Every other failure is an error.
    async fn log_group_exists(&self, name: &str) -> Result<bool>;
}
