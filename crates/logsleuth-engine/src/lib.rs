// Engine module - trace traversal and query seeding logic.
// This layer is pure with respect to AWS: it talks to the trace store and
// the log-delivery probe only through the traits in `traits`, so every
// algorithm here is testable against in-memory fakes.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod path;
pub mod traits;
pub mod walker;

pub use aggregate::{finalize, gather_log_info};
pub use error::{Error, Result};
pub use filter::append_trace_filter;
pub use traits::{DeliveryProbe, TraceStore};
pub use walker::{traverse, TraversalState};
