//! # waypost-dispatch
//!
//! Outbound task notification for the Waypost activities.
//!
//! The dispatcher tells an external fulfillment system that a task is
//! waiting. It runs strictly after the matching suspension has been
//! registered with the host, and its failure is deliberately non-fatal:
//! the suspension stays active and remediation for a lost notification is
//! an operator concern. No retries live at this seam; a retrying decorator
//! around [`TaskDispatcher`] is the extension point if a deployment wants
//! one.

mod dispatcher;
mod http;

pub use dispatcher::{DispatchError, TaskDispatcher};
pub use http::HttpTaskDispatcher;
