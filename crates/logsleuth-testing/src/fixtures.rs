//! Builders for trace documents and segment payloads.
//!
//! Segment documents are built as real JSON text so tests exercise the same
//! parse-then-extract path production does.

use serde_json::{json, Map, Value};

use logsleuth_types::{Segment, TraceDocument};

/// A trace document with the given id and segments.
pub fn trace(id: &str, segments: Vec<Segment>) -> TraceDocument {
    TraceDocument {
        id: id.to_string(),
        segments,
    }
}

/// Start building a segment document. `build()` yields a [`Segment`] whose
/// payload is the accumulated JSON.
pub fn segment() -> SegmentBuilder {
    SegmentBuilder::default()
}

#[derive(Default)]
pub struct SegmentBuilder {
    request_id: Option<String>,
    start_time: Option<f64>,
    end_time: Option<f64>,
    rest_api: Option<(String, String)>,
    log_groups: Vec<String>,
    links: Vec<String>,
}

impl SegmentBuilder {
    pub fn request_id(mut self, id: &str) -> Self {
        self.request_id = Some(id.to_string());
        self
    }

    pub fn times(mut self, start: f64, end: f64) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn rest_api(mut self, rest_api_id: &str, stage: &str) -> Self {
        self.rest_api = Some((rest_api_id.to_string(), stage.to_string()));
        self
    }

    pub fn log_groups(mut self, groups: &[&str]) -> Self {
        self.log_groups = groups.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn links(mut self, trace_ids: &[&str]) -> Self {
        self.links = trace_ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> Segment {
        let mut aws = Map::new();
        if let Some(request_id) = &self.request_id {
            aws.insert("request_id".to_string(), json!(request_id));
        }
        if let Some((id, stage)) = &self.rest_api {
            aws.insert(
                "api_gateway".to_string(),
                json!({"rest_api_id": id, "stage": stage}),
            );
        }
        if !self.log_groups.is_empty() {
            let entries: Vec<Value> = self
                .log_groups
                .iter()
                .map(|g| json!({"log_group": g}))
                .collect();
            aws.insert("cloudwatch_logs".to_string(), Value::Array(entries));
        }

        let mut doc = Map::new();
        doc.insert("name".to_string(), json!("test-segment"));
        if !aws.is_empty() {
            doc.insert("aws".to_string(), Value::Object(aws));
        }
        if let Some(start) = self.start_time {
            doc.insert("start_time".to_string(), json!(start));
        }
        if let Some(end) = self.end_time {
            doc.insert("end_time".to_string(), json!(end));
        }
        if !self.links.is_empty() {
            let entries: Vec<Value> = self
                .links
                .iter()
                .map(|t| json!({"trace_id": t}))
                .collect();
            doc.insert("links".to_string(), Value::Array(entries));
        }

        Segment::with_document(Value::Object(doc).to_string())
    }
}
