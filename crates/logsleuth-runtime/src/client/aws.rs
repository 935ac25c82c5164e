//! AWS-backed implementations of the service traits: X-Ray as the trace
//! store, CloudWatch Logs as both the delivery probe and the query service.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::query::{QueryService, QuerySpec};
use logsleuth_engine::{DeliveryProbe, TraceStore};
use logsleuth_types::{
    PollResponse, QueryHandle, QueryStats, QueryStatus, ResultField, ResultRow, Segment,
    TraceDocument,
};

/// The full set of AWS clients the tool needs, built from one shared config.
pub struct AwsClients {
    pub trace_store: XRayTraceStore,
    pub delivery_probe: LogsDeliveryProbe,
    pub query_service: InsightsQueryService,
}

impl AwsClients {
    /// Load the ambient AWS configuration (env, profile, instance metadata)
    /// and construct all three adapters from it.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let logs = aws_sdk_cloudwatchlogs::Client::new(&config);
        Self {
            trace_store: XRayTraceStore {
                client: aws_sdk_xray::Client::new(&config),
            },
            delivery_probe: LogsDeliveryProbe {
                client: logs.clone(),
            },
            query_service: InsightsQueryService { client: logs },
        }
    }
}

/// Trace store backed by X-Ray `BatchGetTraces`.
pub struct XRayTraceStore {
    client: aws_sdk_xray::Client,
}

#[async_trait]
impl TraceStore for XRayTraceStore {
    async fn batch_get(&self, trace_id: &str) -> Result<Vec<TraceDocument>> {
        let out = self
            .client
            .batch_get_traces()
            .trace_ids(trace_id)
            .send()
            .await
            .context("BatchGetTraces")?;

        let mut documents = Vec::with_capacity(out.traces().len());
        for trace in out.traces() {
            let segments = trace
                .segments()
                .iter()
                .map(|s| Segment {
                    id: s.id().map(str::to_string),
                    document: s.document().map(str::to_string),
                })
                .collect();
            documents.push(TraceDocument {
                id: trace.id().unwrap_or(trace_id).to_string(),
                segments,
            });
        }
        Ok(documents)
    }
}

/// Delivery probe backed by `DescribeSubscriptionFilters`.
///
/// The call is the cheapest way to ask "does this log group exist" that
/// distinguishes the not-found answer from every other failure.
pub struct LogsDeliveryProbe {
    client: aws_sdk_cloudwatchlogs::Client,
}

#[async_trait]
impl DeliveryProbe for LogsDeliveryProbe {
    async fn log_group_exists(&self, name: &str) -> Result<bool> {
        match self
            .client
            .describe_subscription_filters()
            .log_group_name(name)
            .limit(1)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Ok(false)
            }
            Err(err) => Err(anyhow::Error::new(err).context("DescribeSubscriptionFilters")),
        }
    }
}

/// Query service backed by CloudWatch Logs Insights.
pub struct InsightsQueryService {
    client: aws_sdk_cloudwatchlogs::Client,
}

#[async_trait]
impl QueryService for InsightsQueryService {
    async fn submit(&self, spec: &QuerySpec) -> Result<QueryHandle> {
        let out = self
            .client
            .start_query()
            .start_time(spec.start_time.timestamp())
            .end_time(spec.end_time.timestamp())
            .query_string(&spec.query)
            .set_log_group_names(Some(spec.log_groups.clone()))
            .set_limit(spec.limit)
            .send()
            .await
            .context("StartQuery")?;

        let id = out.query_id().context("StartQuery returned no query id")?;
        Ok(QueryHandle::new(id))
    }

    async fn poll(&self, handle: &QueryHandle) -> Result<PollResponse> {
        let out = self
            .client
            .get_query_results()
            .query_id(handle.as_str())
            .send()
            .await
            .context("GetQueryResults")?;

        let status = out
            .status()
            .map(|s| QueryStatus::parse(s.as_str()))
            .unwrap_or(QueryStatus::Other("<missing>".to_string()));

        let statistics = out.statistics().map(|s| QueryStats {
            records_matched: s.records_matched(),
            records_scanned: s.records_scanned(),
            bytes_scanned: s.bytes_scanned(),
        });

        // The service hands back all completed rows in one response; they
        // form a single page here.
        let rows: Vec<ResultRow> = out
            .results()
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|f| match (f.field(), f.value()) {
                        (Some(field), Some(value)) => Some(ResultField::new(field, value)),
                        _ => None,
                    })
                    .collect()
            })
            .collect();
        let pages = if rows.is_empty() { vec![] } else { vec![rows] };

        Ok(PollResponse {
            status,
            statistics,
            pages,
        })
    }

    async fn cancel(&self, handle: &QueryHandle) -> Result<()> {
        self.client
            .stop_query()
            .query_id(handle.as_str())
            .send()
            .await
            .context("StopQuery")?;
        Ok(())
    }
}
