pub mod aws;

pub use aws::{AwsClients, InsightsQueryService, LogsDeliveryProbe, XRayTraceStore};
