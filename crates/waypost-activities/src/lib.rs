//! # waypost-activities
//!
//! Plug-in activities for the host workflow engine:
//!
//! - [`RunTask`] hands a named task to an external fulfillment system,
//!   suspends, and resumes with whatever payload that system reports back
//! - [`FlowDecision`] routes a flow to a `True`/`False` edge by searching a
//!   structured value for a boolean `Decided` flag
//! - [`UploadFile`] is a single-shot document upload helper
//!
//! Activities are variants of one capability set (produces output,
//! consumes resume input, may suspend) expressed through the [`Activity`]
//! trait and an [`ActivityProfile`], not an inheritance hierarchy. All
//! collaborators (dispatcher, id generator, HTTP client) are injected at
//! construction.

mod activity;
mod decision;
mod run_task;
mod upload;

pub use activity::{Activity, ActivityProfile};
pub use decision::{decide, evaluate, evaluate_str, DecisionError, FlowDecision, DECIDED_FIELD};
pub use run_task::{RunTask, RUN_TASK_INPUT_KEY};
pub use upload::UploadFile;
