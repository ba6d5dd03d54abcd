//! Route Handlers

pub mod clean;
pub mod explorer;
pub mod system;

use crate::error::{ApiError, ApiResult};

/// Run frame work off the async runtime
///
/// Parsing, cleaning and chart building are CPU bound, so handlers hand them
/// to the blocking pool and hold no state lock while they run.
pub(crate) async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))?
}
