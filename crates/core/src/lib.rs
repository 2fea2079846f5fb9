pub mod error;
pub mod payload;
pub mod source;
pub mod state;

pub use error::{MonitorError, Result};
pub use payload::{parse_payload, MetricsPayload};
pub use source::MetricsSource;
pub use state::{MemoryUnit, MetricSample, ResourceSnapshot, ResourceState};
