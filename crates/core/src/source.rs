use crate::{payload::MetricsPayload, Result};
use async_trait::async_trait;

/// Anything that can produce a metrics payload on demand.
///
/// `Ok(None)` means the server answered but had no data (non-ok status or a
/// `null` body); `Err` means the request itself failed. The model treats both
/// the same way.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch(&self) -> Result<Option<MetricsPayload>>;
}
