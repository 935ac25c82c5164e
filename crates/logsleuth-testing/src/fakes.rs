//! In-memory implementations of the three service traits.
//!
//! All fakes are deterministic and record enough about the calls they see
//! (fetch counts, probed names, cancel counts) for tests to assert on
//! interaction shape, not just final output.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use logsleuth_engine::{DeliveryProbe, TraceStore};
use logsleuth_runtime::{QueryService, QuerySpec};
use logsleuth_types::{PollResponse, QueryHandle, TraceDocument};

/// Trace store backed by a map from trace id to its document batch.
/// Unknown ids return an empty batch, like the real store.
#[derive(Default)]
pub struct MemoryTraceStore {
    traces: HashMap<String, Vec<TraceDocument>>,
    errors: HashMap<String, String>,
    fetch_counts: Mutex<HashMap<String, usize>>,
}

impl MemoryTraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, document: TraceDocument) -> Self {
        self.traces
            .entry(document.id.clone())
            .or_default()
            .push(document);
        self
    }

    /// Make every fetch of `trace_id` fail with `message`.
    pub fn with_error(mut self, trace_id: &str, message: &str) -> Self {
        self.errors
            .insert(trace_id.to_string(), message.to_string());
        self
    }

    /// How many times `trace_id` has been fetched.
    pub fn fetch_count(&self, trace_id: &str) -> usize {
        *self
            .fetch_counts
            .lock()
            .unwrap()
            .get(trace_id)
            .unwrap_or(&0)
    }
}

#[async_trait]
impl TraceStore for MemoryTraceStore {
    async fn batch_get(&self, trace_id: &str) -> Result<Vec<TraceDocument>> {
        *self
            .fetch_counts
            .lock()
            .unwrap()
            .entry(trace_id.to_string())
            .or_insert(0) += 1;

        if let Some(message) = self.errors.get(trace_id) {
            bail!("{}", message);
        }
        Ok(self.traces.get(trace_id).cloned().unwrap_or_default())
    }
}

/// Delivery probe answering from a fixed set of existing log-group names.
#[derive(Default)]
pub struct StaticDeliveryProbe {
    groups: BTreeSet<String>,
    error: Option<String>,
    probed: Mutex<Vec<String>>,
}

impl StaticDeliveryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.groups.insert(name.to_string());
        self
    }

    /// Make every probe fail with `message` (a non-not-found failure).
    pub fn with_error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    /// Every name probed so far, in probe order.
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryProbe for StaticDeliveryProbe {
    async fn log_group_exists(&self, name: &str) -> Result<bool> {
        self.probed.lock().unwrap().push(name.to_string());
        if let Some(message) = &self.error {
            bail!("{}", message);
        }
        Ok(self.groups.contains(name))
    }
}

/// Query service that replays a scripted sequence of poll outcomes.
pub struct ScriptedQueryService {
    script: Mutex<VecDeque<Result<PollResponse, String>>>,
    submits: AtomicUsize,
    cancels: AtomicUsize,
    hang_on_cancel: bool,
    hang_when_exhausted: bool,
}

impl ScriptedQueryService {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            submits: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
            hang_on_cancel: false,
            hang_when_exhausted: false,
        }
    }

    pub fn with_response(self, response: PollResponse) -> Self {
        self.script.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Script a transport-level poll failure.
    pub fn with_poll_error(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Make `cancel` block forever, to exercise the independent cleanup
    /// timeout.
    pub fn with_hanging_cancel(mut self) -> Self {
        self.hang_on_cancel = true;
        self
    }

    /// Once the script runs dry, make `poll` block forever instead of
    /// erroring; models an in-flight call that never returns.
    pub fn with_hanging_poll(mut self) -> Self {
        self.hang_when_exhausted = true;
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedQueryService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryService for ScriptedQueryService {
    async fn submit(&self, _spec: &QuerySpec) -> Result<QueryHandle> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        Ok(QueryHandle::new("scripted-query-1"))
    }

    async fn poll(&self, _handle: &QueryHandle) -> Result<PollResponse> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!("{}", message)),
            None if self.hang_when_exhausted => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(anyhow!("poll script exhausted")),
        }
    }

    async fn cancel(&self, _handle: &QueryHandle) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        if self.hang_on_cancel {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}
