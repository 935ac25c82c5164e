//! The query lifecycle: submit, poll with backoff until terminal, stream
//! rows, and guarantee a best-effort cancel whenever the query did not run
//! to completion.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::backoff::ExponentialBackoff;
use crate::error::{Error, Result};
use crate::sink;
use logsleuth_types::{PollResponse, QueryHandle, QueryStats, QueryStatus};

/// Budget for the cleanup cancel. Independent of the caller's token: the
/// token is usually already cancelled when cleanup runs.
const CANCEL_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything needed to submit one query.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub log_groups: Vec<String>,
    /// Opaque query text; passed through unmodified.
    pub query: String,
    /// Row cap, overriding any limit clause inside the query text.
    pub limit: Option<i32>,
}

/// The asynchronous log-query service.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn submit(&self, spec: &QuerySpec) -> anyhow::Result<QueryHandle>;
    async fn poll(&self, handle: &QueryHandle) -> anyhow::Result<PollResponse>;
    async fn cancel(&self, handle: &QueryHandle) -> anyhow::Result<()>;
}

/// Drives one query from submission to a terminal state.
///
/// The loop is strictly sequential: it suspends only at the backoff sleep
/// and at outbound service calls, and both are raced against the
/// cancellation token. There is no overall deadline here; a caller that
/// wants one cancels the token.
pub struct QueryRunner<'a> {
    service: &'a dyn QueryService,
    backoff: ExponentialBackoff,
    cancel: CancellationToken,
}

impl<'a> QueryRunner<'a> {
    pub fn new(service: &'a dyn QueryService, cancel: CancellationToken) -> Self {
        Self {
            service,
            backoff: ExponentialBackoff::default(),
            cancel,
        }
    }

    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Submit `spec` and poll until the query reaches a terminal state,
    /// writing completed rows to `out` as JSON lines.
    ///
    /// On every exit path the last statistics snapshot seen (if any) is
    /// written to `stat`, and unless the query ran to completion a
    /// best-effort cancel is issued against the handle.
    pub async fn run(
        &mut self,
        spec: &QuerySpec,
        out: &mut dyn Write,
        stat: &mut dyn Write,
    ) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let handle = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            result = self.service.submit(spec) => result.map_err(Error::Service)?,
        };
        info!(query_id = %handle, "query submitted");

        let mut last_stats: Option<QueryStats> = None;
        let mut completed = false;
        let result = self
            .poll_loop(&handle, out, &mut last_stats, &mut completed)
            .await;

        if !completed {
            self.stop_query(&handle).await;
        }

        if let Some(stats) = &last_stats {
            if let Err(err) = sink::write_stats(stat, stats) {
                warn!(error = %err, "failed to write final statistics");
            }
        }

        result
    }

    async fn poll_loop(
        &mut self,
        handle: &QueryHandle,
        out: &mut dyn Write,
        last_stats: &mut Option<QueryStats>,
        completed: &mut bool,
    ) -> Result<()> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let response = tokio::select! {
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                result = self.service.poll(handle) => result.map_err(Error::Service)?,
            };

            if let Some(stats) = response.statistics {
                *last_stats = Some(stats);
            }
            info!(status = %response.status, stats = ?response.statistics, "poll");

            match response.status {
                QueryStatus::Scheduled | QueryStatus::Running => {
                    let Some(delay) = self.backoff.next_delay() else {
                        return Err(Error::BackoffExhausted);
                    };
                    tokio::select! {
                        _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                QueryStatus::Complete => {
                    for page in &response.pages {
                        for row in page {
                            sink::write_row(out, row)?;
                        }
                    }
                    *completed = true;
                    return Ok(());
                }
                QueryStatus::Failed => {
                    return Err(Error::QueryFailed(response.status.to_string()));
                }
                QueryStatus::Other(status) => return Err(Error::UnexpectedStatus(status)),
            }
        }
    }

    /// Best-effort cancel under its own timeout. Failures are logged and
    /// never replace the error that brought us here.
    async fn stop_query(&self, handle: &QueryHandle) {
        match tokio::time::timeout(CANCEL_TIMEOUT, self.service.cancel(handle)).await {
            Ok(Ok(())) => info!(query_id = %handle, "query cancelled"),
            Ok(Err(err)) => warn!(query_id = %handle, error = %err, "failed to cancel query"),
            Err(_) => warn!(query_id = %handle, "cancel request timed out"),
        }
    }
}

