//! # waypost-core
//!
//! Core types for the Waypost task handoff plug-ins.
//!
//! Waypost activities hand work to an external fulfillment system, suspend,
//! and resume when that system reports completion. The host workflow engine
//! owns graph execution, persistence, and bookmark storage; this crate
//! defines everything that crosses that boundary:
//!
//! - A [`Stimulus`] is the correlation key registered before dispatch
//! - A [`Continuation`] names the resume routine to run on a match
//! - [`ActivityContext`] is the per-invocation view of the host
//! - [`MemoryHost`] is an in-process host for tests and demos
//!
//! The one ordering rule everything else hangs off of: a suspension is
//! registered with the host *before* the outbound notification leaves the
//! process, so a fast responder always finds something listening.

mod config;
mod error;
mod host;
mod memory;
mod request;
mod stimulus;
mod types;

pub use config::{DispatchConfig, UploadConfig, WaypostConfig};
pub use error::{Result, WaypostError};
pub use host::ActivityContext;
pub use memory::{MemoryContext, MemoryHost, SuspensionRecord};
pub use request::TaskRequest;
pub use stimulus::Stimulus;
pub use types::{
    ActivityEvent, ActivityState, Continuation, IdGenerator, Outcome, TaskId, UuidGenerator,
};
