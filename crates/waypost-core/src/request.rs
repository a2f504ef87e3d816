//! Outbound task request payload

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Stimulus, TaskId};

/// Describes a task the external system is asked to run.
///
/// Owned transiently by the dispatch path; nothing here is persisted by
/// this crate set. The payload map is order-insensitive; a `BTreeMap`
/// keeps its serialization deterministic without making order meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Workflow instance that requested the task.
    pub instance_id: Uuid,
    pub task_id: TaskId,
    pub task_name: String,
    pub payload: Option<BTreeMap<String, Value>>,
    pub shared_secret: Option<String>,
    pub route_url: Option<String>,
    pub allowed_roles: Option<Vec<String>>,
    pub detailed_description: Option<String>,
    pub notification_name: Option<String>,
    pub notification_message: Option<String>,
}

impl TaskRequest {
    /// Build the request that pairs with an already-registered stimulus.
    ///
    /// Both halves of the operation carry the same optional fields; taking
    /// them from the stimulus keeps the two from drifting apart.
    pub fn from_stimulus(
        instance_id: Uuid,
        stimulus: &Stimulus,
        payload: Option<BTreeMap<String, Value>>,
    ) -> Self {
        Self {
            instance_id,
            task_id: stimulus.task_id.clone(),
            task_name: stimulus.task_name.clone(),
            payload,
            shared_secret: stimulus.shared_secret.clone(),
            route_url: stimulus.route_url.clone(),
            allowed_roles: stimulus.allowed_roles.clone(),
            detailed_description: stimulus.detailed_description.clone(),
            notification_name: stimulus.notification_name.clone(),
            notification_message: stimulus.notification_message.clone(),
        }
    }
}
