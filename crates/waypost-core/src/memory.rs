//! In-memory host harness
//!
//! The real host keeps suspensions in durable storage and routes signals
//! across processes. This harness implements the same contract in a single
//! process so the register/dispatch/resume cycle can be exercised end to
//! end by tests and demos. Nothing here survives a restart, which is
//! exactly why production state belongs to the real host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    ActivityContext, ActivityEvent, ActivityState, Continuation, Outcome, Result, Stimulus,
    WaypostError,
};

/// A suspension held by the harness.
#[derive(Debug, Clone)]
pub struct SuspensionRecord {
    pub instance_id: Uuid,
    pub stimulus: Stimulus,
    pub continuation: Continuation,
    pub scoped_to_instance: bool,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct HostInner {
    /// Correlation hash → registered suspension.
    suspensions: HashMap<String, SuspensionRecord>,
    /// Append-only journal of host-visible events, for assertions on
    /// ordering (registration must precede dispatch).
    events: Vec<String>,
}

/// Shared in-process host. Cloning shares the underlying bookmark store, so
/// contexts created from clones register into the same place.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    inner: Arc<Mutex<HostInner>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context for one activity invocation in a fresh instance.
    pub fn context(&self) -> MemoryContext {
        MemoryContext {
            host: self.clone(),
            instance_id: Uuid::new_v4(),
            state: ActivityState::Created,
            resumed_inputs: HashMap::new(),
            result: None,
            outcome: None,
            cancel: CancellationToken::new(),
            fail_registration: false,
        }
    }

    pub fn suspension_count(&self) -> usize {
        self.inner.lock().unwrap().suspensions.len()
    }

    /// Snapshot of currently registered suspensions.
    pub fn suspensions(&self) -> Vec<SuspensionRecord> {
        self.inner
            .lock()
            .unwrap()
            .suspensions
            .values()
            .cloned()
            .collect()
    }

    /// Deliver an external completion signal.
    ///
    /// Matches on the correlation hash and removes the suspension, so a
    /// duplicate of the same signal finds nothing: each registration is
    /// resumed at most once. Returns None when no suspension matches;
    /// rejecting such signals is the host's job, not the activities'.
    pub fn deliver(&self, stimulus: &Stimulus) -> Option<SuspensionRecord> {
        let hash = stimulus.correlation_hash();
        let mut inner = self.inner.lock().unwrap();
        match inner.suspensions.remove(&hash) {
            Some(record) => {
                inner.events.push(format!("delivered:{}", hash));
                Some(record)
            }
            None => {
                tracing::debug!("No suspension matches correlation hash {}", hash);
                None
            }
        }
    }

    /// Append an entry to the host journal. The harness records its own
    /// registrations and deliveries; test collaborators (e.g. a recording
    /// dispatcher) can append theirs to assert cross-component ordering.
    pub fn record(&self, event: impl Into<String>) {
        self.inner.lock().unwrap().events.push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.inner.lock().unwrap().events.clone()
    }
}

/// Per-invocation [`ActivityContext`] backed by a [`MemoryHost`].
#[derive(Debug)]
pub struct MemoryContext {
    host: MemoryHost,
    instance_id: Uuid,
    state: ActivityState,
    resumed_inputs: HashMap<String, Value>,
    result: Option<Value>,
    outcome: Option<Outcome>,
    cancel: CancellationToken,
    fail_registration: bool,
}

impl MemoryContext {
    pub fn state(&self) -> ActivityState {
        self.state
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Make the next `register_suspension` call fail, simulating the host
    /// being unable to persist the suspension point.
    pub fn fail_next_registration(&mut self) {
        self.fail_registration = true;
    }

    /// Stage the payload delivered with a completion signal and move the
    /// activity to `Resumed`. Call after [`MemoryHost::deliver`], before
    /// driving the activity's resume routine.
    pub fn begin_resume(&mut self, inputs: HashMap<String, Value>) {
        self.resumed_inputs = inputs;
        self.state = self.state.apply(ActivityEvent::Resumed);
    }
}

impl ActivityContext for MemoryContext {
    fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    fn register_suspension(
        &mut self,
        stimulus: &Stimulus,
        continuation: Continuation,
        scope_to_instance: bool,
    ) -> Result<()> {
        if self.fail_registration {
            self.fail_registration = false;
            return Err(WaypostError::Registration(
                "host persistence unavailable".to_string(),
            ));
        }

        let hash = stimulus.correlation_hash();
        let record = SuspensionRecord {
            instance_id: self.instance_id,
            stimulus: stimulus.clone(),
            continuation,
            scoped_to_instance: scope_to_instance,
            registered_at: Utc::now(),
        };

        let mut inner = self.host.inner.lock().unwrap();
        inner.events.push(format!("registered:{}", hash));
        inner.suspensions.insert(hash, record);
        drop(inner);

        self.state = self.state.apply(ActivityEvent::SuspensionRegistered);
        Ok(())
    }

    fn resumed_input(&self, key: &str) -> Option<Value> {
        self.resumed_inputs.get(key).cloned()
    }

    fn set_result(&mut self, value: Value) {
        self.result = Some(value);
    }

    fn complete(&mut self) {
        self.state = self.state.apply(ActivityEvent::Completed);
    }

    fn complete_with_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.state = self.state.apply(ActivityEvent::Completed);
    }

    fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskId;

    fn stimulus(id: &str) -> Stimulus {
        Stimulus::new(TaskId::new(id), "approve-po")
    }

    fn continuation() -> Continuation {
        Continuation::DeliverTaskResult {
            input_key: "RunTaskInput".to_string(),
        }
    }

    #[test]
    fn test_register_then_deliver() {
        let host = MemoryHost::new();
        let mut ctx = host.context();

        ctx.register_suspension(&stimulus("task-1"), continuation(), false)
            .unwrap();
        assert_eq!(ctx.state(), ActivityState::Suspended);
        assert_eq!(host.suspension_count(), 1);

        let record = host.deliver(&stimulus("task-1")).unwrap();
        assert_eq!(record.instance_id, ctx.instance_id());
        assert_eq!(record.continuation, continuation());
        assert_eq!(host.suspension_count(), 0);
    }

    #[test]
    fn test_duplicate_signal_finds_nothing() {
        let host = MemoryHost::new();
        let mut ctx = host.context();
        ctx.register_suspension(&stimulus("task-1"), continuation(), false)
            .unwrap();

        assert!(host.deliver(&stimulus("task-1")).is_some());
        assert!(host.deliver(&stimulus("task-1")).is_none());
    }

    #[test]
    fn test_unmatched_signal_is_rejected() {
        let host = MemoryHost::new();
        assert!(host.deliver(&stimulus("never-registered")).is_none());
    }

    #[test]
    fn test_registration_failure_registers_nothing() {
        let host = MemoryHost::new();
        let mut ctx = host.context();
        ctx.fail_next_registration();

        let err = ctx
            .register_suspension(&stimulus("task-1"), continuation(), false)
            .unwrap_err();
        assert!(matches!(err, WaypostError::Registration(_)));
        assert_eq!(host.suspension_count(), 0);
        assert_eq!(ctx.state(), ActivityState::Created);
    }

    #[test]
    fn test_contexts_share_one_bookmark_store() {
        let host = MemoryHost::new();
        let mut a = host.context();
        let mut b = host.context();

        a.register_suspension(&stimulus("task-1"), continuation(), false)
            .unwrap();
        b.register_suspension(&stimulus("task-2"), continuation(), false)
            .unwrap();

        assert_eq!(host.suspension_count(), 2);
        let record = host.deliver(&stimulus("task-2")).unwrap();
        assert_eq!(record.instance_id, b.instance_id());
        assert_eq!(host.suspension_count(), 1);
    }

    #[test]
    fn test_journal_orders_events() {
        let host = MemoryHost::new();
        let mut ctx = host.context();
        ctx.register_suspension(&stimulus("task-1"), continuation(), false)
            .unwrap();
        host.record("dispatch:task-1");

        let events = host.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("registered:"));
        assert_eq!(events[1], "dispatch:task-1");
    }
}
