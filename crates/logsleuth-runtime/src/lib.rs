// Runtime module - query lifecycle orchestration and service adapters.
// The polling state machine lives here, behind the `QueryService` trait so
// it can run against scripted fakes; `client` holds the AWS-backed
// implementations of every service trait the tool needs.

pub mod backoff;
pub mod client;
pub mod error;
pub mod query;
pub mod sink;

pub use backoff::ExponentialBackoff;
pub use error::{Error, Result};
pub use query::{QueryRunner, QueryService, QuerySpec};
