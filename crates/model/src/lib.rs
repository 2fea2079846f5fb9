//! Polling resource-usage model.
//!
//! Wires together:
//! - a [`MetricsSource`](sysmon_core::MetricsSource) fetched on a self-scheduling timer
//! - exponential [`backoff`] while the endpoint keeps failing
//! - a fixed-length [`history`] of derived samples
//! - a [`signal`] that broadcasts every state change to observers

pub mod backoff;
pub mod history;
pub mod model;
pub mod signal;
pub mod units;

pub use backoff::Backoff;
pub use history::{SampleHistory, HISTORY_LEN};
pub use model::{ModelOptions, ResourceModel, DEFAULT_MAX_BACKOFF};
pub use signal::{Signal, SlotId};
pub use units::convert_to_largest_unit;
