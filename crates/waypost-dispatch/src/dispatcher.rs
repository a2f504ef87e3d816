//! Task dispatch abstraction

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use waypost_core::TaskRequest;

/// Errors from a single dispatch attempt.
///
/// These are typed so tests can tell a failed notification apart from a
/// delivered one, but callers treat them as non-fatal: the activity logs
/// the error and leaves its registered suspension in place.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Dispatch cancelled")]
    Cancelled,
}

/// Dispatches a request for running a task.
#[async_trait]
pub trait TaskDispatcher: Send + Sync {
    /// Send a task-start notification to the external system.
    ///
    /// Implementations must honor `cancel`: aborting the outbound call
    /// must not disturb any suspension already registered with the host.
    async fn dispatch(
        &self,
        request: &TaskRequest,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError>;
}
