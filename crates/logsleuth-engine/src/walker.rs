//! Cycle-safe traversal of the trace graph reachable from one root id.
//!
//! Traces link to child traces through their segment documents, and linked
//! graphs observed in the wild do contain cycles (a retried request linking
//! back to an ancestor trace). The walk is an explicit work-stack loop so
//! traversal depth never depends on call-stack limits; the visited set is
//! the sole termination guard.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::path;
use crate::traits::TraceStore;
use logsleuth_types::RestApi;

const REQUEST_ID: &str = "$.aws.request_id";
const START_TIME: &str = "$.start_time";
const END_TIME: &str = "$.end_time";
const API_GATEWAY: &str = "$.aws.api_gateway";
const LOG_GROUPS: &str = "$.aws.cloudwatch_logs..log_group";
const TRACE_LINKS: &str = "$.links..trace_id";

/// Mutable accumulator owned by one traversal invocation.
///
/// `visited` guards against refetching (and against cycles); `found` tracks
/// the subset of visited ids whose fetch actually returned documents. The
/// aggregator keys "trace not found" off `found`, not `visited`. All sets
/// are ordered so two traversals of the same static graph produce identical
/// output.
#[derive(Debug, Default)]
pub struct TraversalState {
    visited: BTreeSet<String>,
    pub(crate) found: BTreeSet<String>,
    pub(crate) request_ids: BTreeSet<String>,
    pub(crate) rest_apis: BTreeSet<RestApi>,
    pub(crate) log_groups: BTreeSet<String>,
    start_time: f64,
    end_time: f64,
}

impl TraversalState {
    pub fn new() -> Self {
        Self {
            start_time: f64::MAX,
            end_time: 0.0,
            ..Self::default()
        }
    }

    pub fn found_trace_ids(&self) -> &BTreeSet<String> {
        &self.found
    }

    pub fn request_ids(&self) -> &BTreeSet<String> {
        &self.request_ids
    }

    pub fn rest_apis(&self) -> &BTreeSet<RestApi> {
        &self.rest_apis
    }

    pub fn log_groups(&self) -> &BTreeSet<String> {
        &self.log_groups
    }

    /// Raw epoch-second bounds observed across all segments, or `None` when
    /// either bound was never observed (sentinels untouched).
    pub fn window(&self) -> Option<(f64, f64)> {
        if self.start_time == f64::MAX || self.end_time == 0.0 {
            return None;
        }
        Some((self.start_time, self.end_time))
    }
}

/// Walk the trace graph from `root`, populating `state`.
///
/// Each reachable id is fetched at most once; an id is marked visited only
/// after its fetch succeeds, so a transient fetch failure aborts without
/// poisoning the guard set. A fetch returning zero documents is a leaf.
/// Any fetch, parse, or extraction error aborts the whole traversal and the
/// caller must discard `state`.
pub async fn traverse(
    store: &dyn TraceStore,
    root: &str,
    state: &mut TraversalState,
) -> Result<()> {
    let mut frontier = vec![root.to_string()];

    while let Some(trace_id) = frontier.pop() {
        if state.visited.contains(&trace_id) {
            continue;
        }

        let documents = store.batch_get(&trace_id).await.map_err(Error::Store)?;
        state.visited.insert(trace_id.clone());

        if documents.is_empty() {
            debug!(trace_id = %trace_id, "trace not found, treating as leaf");
            continue;
        }
        state.found.insert(trace_id);

        let mut links = Vec::new();
        for document in &documents {
            for segment in &document.segments {
                let Some(raw) = segment.document.as_deref() else {
                    continue;
                };
                let node: Value = serde_json::from_str(raw)?;
                scan_segment(&node, state, &mut links)?;
            }
        }

        // Reverse so the first link discovered is expanded first
        // (depth-first pre-order).
        for link in links.into_iter().rev() {
            frontier.push(link);
        }
    }

    Ok(())
}

/// Extract the interesting fields of one segment document into the
/// accumulator and collect its outbound trace links.
fn scan_segment(node: &Value, state: &mut TraversalState, links: &mut Vec<String>) -> Result<()> {
    if let Some(request_id) = path::one_string(node, REQUEST_ID)? {
        state.request_ids.insert(request_id);
    }

    if let Some(start) = path::one_number(node, START_TIME)? {
        state.start_time = state.start_time.min(start);
    }

    if let Some(end) = path::one_number(node, END_TIME)? {
        state.end_time = state.end_time.max(end);
    }

    // The stage is recorded alongside the API id, so read both relative to
    // the enclosing api_gateway object and record the pair only when both
    // are present.
    if let Some(gateway) = path::one_node(node, API_GATEWAY)? {
        let rest_api_id = path::one_string(gateway, "$.rest_api_id")?;
        let stage = path::one_string(gateway, "$.stage")?;
        if let (Some(rest_api_id), Some(stage)) = (rest_api_id, stage) {
            state.rest_apis.insert(RestApi::new(rest_api_id, stage));
        }
    }

    for group in path::all_strings(node, LOG_GROUPS)? {
        state.log_groups.insert(group);
    }

    links.extend(path::all_strings(node, TRACE_LINKS)?);

    Ok(())
}

