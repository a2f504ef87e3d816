//! Run-task activity
//!
//! Notifies the external fulfillment system that a named task is requested,
//! then suspends until the host matches a completion signal back to this
//! execution. The suspension is registered *before* the notification goes
//! out; the reverse order would open a window where a fast responder could
//! report completion with nothing listening, permanently losing the resume.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use waypost_core::{
    ActivityContext, Continuation, IdGenerator, Result, Stimulus, TaskId, TaskRequest,
    WaypostError,
};
use waypost_dispatch::TaskDispatcher;

use crate::{Activity, ActivityProfile};

/// Key used for sending and receiving the resume payload.
pub const RUN_TASK_INPUT_KEY: &str = "RunTaskInput";

/// Requests a given task to be run, and resumes with the payload the
/// fulfilling system reports back.
pub struct RunTask {
    task_name: String,
    payload: Option<BTreeMap<String, Value>>,
    shared_secret: Option<String>,
    route_url: Option<String>,
    allowed_roles: Option<Vec<String>>,
    detailed_description: Option<String>,
    notification_name: Option<String>,
    notification_message: Option<String>,
    dispatcher: Arc<dyn TaskDispatcher>,
    ids: Arc<dyn IdGenerator>,
}

impl RunTask {
    /// Create a run-task activity with explicit collaborators.
    pub fn new(
        task_name: impl Into<String>,
        dispatcher: Arc<dyn TaskDispatcher>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            payload: None,
            shared_secret: None,
            route_url: None,
            allowed_roles: None,
            detailed_description: None,
            notification_name: None,
            notification_message: None,
            dispatcher,
            ids,
        }
    }

    /// Additional parameters to send to the task. Order-insensitive.
    pub fn with_payload(mut self, payload: BTreeMap<String, Value>) -> Self {
        self.payload = Some(payload);
        self
    }

    /// An optional secret or token included with the request.
    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    /// A URL or route the user can navigate to in order to complete the task.
    pub fn with_route_url(mut self, url: impl Into<String>) -> Self {
        self.route_url = Some(url.into());
        self
    }

    /// Which roles can claim or complete this task.
    pub fn with_allowed_roles(mut self, roles: Vec<String>) -> Self {
        self.allowed_roles = Some(roles);
        self
    }

    /// Human-readable instructions for the user performing the task.
    pub fn with_detailed_description(mut self, description: impl Into<String>) -> Self {
        self.detailed_description = Some(description.into());
        self
    }

    /// Trigger a named notification with an optional message body.
    pub fn with_notification(
        mut self,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.notification_name = Some(name.into());
        self.notification_message = Some(message.into());
        self
    }

    fn build_stimulus(&self, task_id: TaskId) -> Stimulus {
        let mut stimulus = Stimulus::new(task_id, self.task_name.clone());
        if let Some(secret) = &self.shared_secret {
            stimulus = stimulus.with_shared_secret(secret.clone());
        }
        if let Some(url) = &self.route_url {
            stimulus = stimulus.with_route_url(url.clone());
        }
        if let Some(roles) = &self.allowed_roles {
            stimulus = stimulus.with_allowed_roles(roles.clone());
        }
        if let Some(description) = &self.detailed_description {
            stimulus = stimulus.with_detailed_description(description.clone());
        }
        if let (Some(name), Some(message)) =
            (&self.notification_name, &self.notification_message)
        {
            stimulus = stimulus.with_notification(name.clone(), message.clone());
        }
        stimulus
    }
}

#[async_trait]
impl Activity for RunTask {
    fn name(&self) -> &str {
        "run_task"
    }

    fn profile(&self) -> ActivityProfile {
        ActivityProfile {
            produces_output: true,
            consumes_resume_input: true,
            may_suspend: true,
        }
    }

    async fn execute(&self, ctx: &mut dyn ActivityContext) -> Result<()> {
        // One task id per dispatch attempt, never reused.
        let task_id = self.ids.generate();
        let stimulus = self.build_stimulus(task_id.clone());

        // Registration must complete before anything leaves the process.
        // A failure here is fatal and no task is dispatched.
        ctx.register_suspension(
            &stimulus,
            Continuation::DeliverTaskResult {
                input_key: RUN_TASK_INPUT_KEY.to_string(),
            },
            false,
        )?;

        let request = TaskRequest::from_stimulus(ctx.instance_id(), &stimulus, self.payload.clone());
        let cancel = ctx.cancellation();

        if let Err(err) = self.dispatcher.dispatch(&request, &cancel).await {
            // Fire-and-forget: the suspension stays active, and remediation
            // for the lost notification is out-of-band.
            tracing::warn!(
                "Dispatch of task '{}' ({}) failed: {}",
                self.task_name,
                task_id,
                err
            );
        }

        Ok(())
    }

    async fn resume(
        &self,
        ctx: &mut dyn ActivityContext,
        continuation: &Continuation,
    ) -> Result<()> {
        match continuation {
            Continuation::DeliverTaskResult { input_key } => {
                // The payload is an opaque pass-through. A missing key is a
                // protocol violation, never silently defaulted.
                let input = ctx
                    .resumed_input(input_key)
                    .ok_or_else(|| WaypostError::MissingResumeInput(input_key.clone()))?;
                ctx.set_result(input);
                ctx.complete();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;
    use waypost_core::UuidGenerator;
    use waypost_dispatch::DispatchError;

    struct NullDispatcher;

    #[async_trait]
    impl TaskDispatcher for NullDispatcher {
        async fn dispatch(
            &self,
            _request: &TaskRequest,
            _cancel: &CancellationToken,
        ) -> std::result::Result<(), DispatchError> {
            Ok(())
        }
    }

    fn activity() -> RunTask {
        RunTask::new("approve-po", Arc::new(NullDispatcher), Arc::new(UuidGenerator))
            .with_shared_secret("s3cret")
            .with_route_url("/tasks/approve")
            .with_allowed_roles(vec!["Manager".to_string()])
            .with_detailed_description("Approve the purchase order")
            .with_notification("po-approval", "A purchase order needs review")
    }

    #[test]
    fn test_profile_is_fully_capable() {
        let profile = activity().profile();
        assert!(profile.produces_output);
        assert!(profile.consumes_resume_input);
        assert!(profile.may_suspend);
    }

    #[test]
    fn test_stimulus_carries_every_optional_field() {
        let stimulus = activity().build_stimulus(TaskId::new("task-1"));
        assert_eq!(stimulus.task_name, "approve-po");
        assert_eq!(stimulus.shared_secret.as_deref(), Some("s3cret"));
        assert_eq!(stimulus.route_url.as_deref(), Some("/tasks/approve"));
        assert_eq!(stimulus.allowed_roles.as_deref().map(|r| r.len()), Some(1));
        assert_eq!(stimulus.notification_name.as_deref(), Some("po-approval"));
    }

    #[test]
    fn test_bare_stimulus_has_no_optionals() {
        let bare = RunTask::new("ship-order", Arc::new(NullDispatcher), Arc::new(UuidGenerator));
        let stimulus = bare.build_stimulus(TaskId::new("task-2"));
        assert!(stimulus.shared_secret.is_none());
        assert!(stimulus.route_url.is_none());
        assert!(stimulus.allowed_roles.is_none());
        assert!(stimulus.detailed_description.is_none());
        assert!(stimulus.notification_name.is_none());
        assert!(stimulus.notification_message.is_none());
    }
}
