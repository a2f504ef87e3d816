//! Correlation stimulus for suspended task activities
//!
//! A stimulus is the key that matches an external completion signal back to
//! a suspended execution. `task_name` rides along for diagnostics and the
//! outbound request but is excluded from the correlation hash: two stimuli
//! that differ only in name correlate identically. Task-id uniqueness makes
//! the exclusion moot in practice, but it is part of the compatibility
//! contract with existing fulfillment systems and must not change.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::TaskId;

/// Correlation key for a suspended task activity.
///
/// Construction is pure and deterministic; equal inputs always produce an
/// equal stimulus and an equal correlation hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    pub task_id: TaskId,
    /// Excluded from the correlation hash.
    pub task_name: String,
    pub shared_secret: Option<String>,
    pub route_url: Option<String>,
    pub allowed_roles: Option<Vec<String>>,
    pub detailed_description: Option<String>,
    pub notification_name: Option<String>,
    pub notification_message: Option<String>,
}

impl Stimulus {
    pub fn new(task_id: TaskId, task_name: impl Into<String>) -> Self {
        Self {
            task_id,
            task_name: task_name.into(),
            shared_secret: None,
            route_url: None,
            allowed_roles: None,
            detailed_description: None,
            notification_name: None,
            notification_message: None,
        }
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    pub fn with_route_url(mut self, url: impl Into<String>) -> Self {
        self.route_url = Some(url.into());
        self
    }

    pub fn with_allowed_roles(mut self, roles: Vec<String>) -> Self {
        self.allowed_roles = Some(roles);
        self
    }

    pub fn with_detailed_description(mut self, description: impl Into<String>) -> Self {
        self.detailed_description = Some(description.into());
        self
    }

    pub fn with_notification(
        mut self,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.notification_name = Some(name.into());
        self.notification_message = Some(message.into());
        self
    }

    /// Hex-encoded SHA-256 over the fields that participate in matching.
    ///
    /// Field order is fixed. Every string is length-prefixed and every
    /// optional field contributes a presence byte, so `Some("")` and `None`
    /// can never collide. `task_name` does not participate.
    pub fn correlation_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hash_str(&mut hasher, self.task_id.as_str());
        // task_name deliberately skipped
        hash_opt(&mut hasher, self.shared_secret.as_deref());
        hash_opt(&mut hasher, self.route_url.as_deref());
        match &self.allowed_roles {
            Some(roles) => {
                hasher.update([1]);
                hasher.update((roles.len() as u64).to_be_bytes());
                for role in roles {
                    hash_str(&mut hasher, role);
                }
            }
            None => hasher.update([0]),
        }
        hash_opt(&mut hasher, self.detailed_description.as_deref());
        hash_opt(&mut hasher, self.notification_name.as_deref());
        hash_opt(&mut hasher, self.notification_message.as_deref());
        hex::encode(hasher.finalize())
    }
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}

fn hash_opt(hasher: &mut Sha256, s: Option<&str>) {
    match s {
        Some(s) => {
            hasher.update([1]);
            hash_str(hasher, s);
        }
        None => hasher.update([0]),
    }
}
