//! Turns a completed traversal into a [`LogInfo`], resolving discovered
//! API Gateway identities to concrete execution log groups on the way.

use chrono::DateTime;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{DeliveryProbe, TraceStore};
use crate::walker::{self, TraversalState};
use logsleuth_types::LogInfo;

/// Walk the graph from `trace_id` and finalize the result in one step.
///
/// `Ok(None)` means the root trace seeded nothing at all, distinct from a
/// LogInfo that merely found nothing interesting.
pub async fn gather_log_info(
    store: &dyn TraceStore,
    probe: &dyn DeliveryProbe,
    trace_id: &str,
) -> Result<Option<LogInfo>> {
    let mut state = TraversalState::new();
    walker::traverse(store, trace_id, &mut state).await?;
    finalize(state, probe).await
}

/// Resolve API Gateway log groups and assemble the final record.
///
/// A probe answering "no such log group" silently drops the pair: access
/// logging is optional and commonly disabled. Any other probe failure
/// aborts. The window is padded by one second on each side.
pub async fn finalize(
    state: TraversalState,
    probe: &dyn DeliveryProbe,
) -> Result<Option<LogInfo>> {
    if state.found.is_empty() {
        return Ok(None);
    }

    let Some((min_start, max_end)) = state.window() else {
        return Err(Error::EmptyWindow);
    };

    let mut log_groups = state.log_groups;
    for api in &state.rest_apis {
        let name = api.execution_log_group();
        if probe.log_group_exists(&name).await.map_err(Error::Probe)? {
            log_groups.insert(name);
        } else {
            debug!(log_group = %name, "no log delivery configured, skipping");
        }
    }

    let start_time = DateTime::from_timestamp(min_start as i64 - 1, 0).ok_or(Error::EmptyWindow)?;
    let end_time = DateTime::from_timestamp(max_end as i64 + 1, 0).ok_or(Error::EmptyWindow)?;

    Ok(Some(LogInfo {
        trace_ids: state.found.into_iter().collect(),
        request_ids: state.request_ids.into_iter().collect(),
        log_groups: log_groups.into_iter().collect(),
        start_time,
        end_time,
    }))
}

