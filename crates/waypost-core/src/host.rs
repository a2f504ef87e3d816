//! Host engine interface
//!
//! The orchestration engine that owns graph execution, persistence,
//! instance addressing, and bookmark storage sits on the other side of this
//! trait. Activities interact with the host exclusively through a context,
//! which keeps them free of shared mutable state: many instances run
//! concurrently, but a single context is only ever driven one logical step
//! at a time.

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{Continuation, Outcome, Result, Stimulus};

/// Per-invocation view of the host engine.
pub trait ActivityContext: Send {
    /// Workflow instance this activity executes in.
    fn instance_id(&self) -> Uuid;

    /// Durably associate `stimulus` with a resume continuation.
    ///
    /// Once this returns Ok, the host guarantees that a signal whose
    /// correlation key equals `stimulus.correlation_hash()` invokes the
    /// continuation exactly once, on a future turn of the host's own
    /// scheduling, possibly in a different process. Failure is fatal for
    /// the activity: callers must not dispatch afterwards. No retries at
    /// this seam.
    ///
    /// `scope_to_instance` additionally qualifies the match with the
    /// instance identity.
    fn register_suspension(
        &mut self,
        stimulus: &Stimulus,
        continuation: Continuation,
        scope_to_instance: bool,
    ) -> Result<()>;

    /// Input supplied by the external completion signal, by well-known key.
    fn resumed_input(&self, key: &str) -> Option<Value>;

    /// Write the activity's declared result slot.
    fn set_result(&mut self, value: Value);

    /// Signal completion to the host.
    fn complete(&mut self);

    /// Signal completion selecting a named outcome edge.
    fn complete_with_outcome(&mut self, outcome: Outcome);

    /// Cancellation signal for in-flight outbound work.
    ///
    /// Cancelling aborts the outbound call only; a suspension that was
    /// already registered stays active.
    fn cancellation(&self) -> CancellationToken;
}
