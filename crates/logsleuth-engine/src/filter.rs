//! Query-text augmentation for trace-seeded runs.
//!
//! The query text itself is opaque; the only transformation ever applied is
//! appending one `| filter` clause matching any discovered trace id or
//! request id. The textual form below is what the query language's filter
//! grammar expects, so it must be reproduced exactly.

use std::fmt::Write;

use logsleuth_types::LogInfo;

/// Append a filter clause matching every trace id against the message body
/// and every request id against both the structured `@requestId` field and
/// the message body.
pub fn append_trace_filter(query: &str, info: &LogInfo) -> String {
    let mut out = String::with_capacity(query.len() + 64);
    out.push_str(query);
    out.push_str("\n| filter ");

    for (i, trace_id) in info.trace_ids.iter().enumerate() {
        if i > 0 {
            out.push_str(" or ");
        }
        let _ = write!(out, "@message like {:?}", trace_id);
    }

    for request_id in &info.request_ids {
        let _ = write!(
            out,
            " or @requestId = {:?} or @message like {:?}",
            request_id, request_id
        );
    }

    out
}
