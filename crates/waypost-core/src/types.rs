//! Core type definitions for Waypost task handoff

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier minted once per dispatch attempt.
///
/// Ids are never reused: two attempts at the same logical task get two
/// distinct ids, which is what keeps their suspensions independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints task ids for dispatch attempts.
///
/// Injected into activities rather than pulled from ambient context so
/// tests can substitute a deterministic generator.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> TaskId;
}

/// Default generator backed by UUID v4
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> TaskId {
        TaskId::new(Uuid::new_v4().to_string())
    }
}

/// Named edge selected by a branching activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    True,
    False,
}

impl Outcome {
    pub fn from_bool(decided: bool) -> Self {
        if decided {
            Self::True
        } else {
            Self::False
        }
    }

    /// Outcome name as the host's flow nodes expect it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(Self::True),
            "False" => Ok(Self::False),
            _ => Err(format!("Invalid outcome: {}", s)),
        }
    }
}

/// Serializable descriptor naming the resume routine to invoke on a match.
///
/// The host stores this alongside the suspension, possibly across process
/// restarts, so it carries a stable tag and the minimal state the routine
/// needs instead of an in-memory closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Continuation {
    /// Deliver the external payload found at `input_key` into the result
    /// slot and complete the activity.
    DeliverTaskResult { input_key: String },
}

/// Conceptual lifecycle of a task activity.
///
/// The host owns the durable record; this model backs the in-memory
/// harness and pins down the transition rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    #[default]
    Created,
    Suspended,
    Dispatched,
    Resumed,
    Completed,
}

/// Events that drive activity state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    SuspensionRegistered,
    DispatchSucceeded,
    DispatchFailed,
    Resumed,
    Completed,
}

impl ActivityState {
    /// Returns true once no further progress is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Pure transition function. Deterministic, never panics.
    ///
    /// Events that do not apply leave the state unchanged: a failed
    /// dispatch keeps the activity `Suspended`, and `Completed` absorbs
    /// everything, so a late signal can never re-open a finished activity.
    pub fn apply(self, event: ActivityEvent) -> Self {
        match (self, event) {
            (Self::Created, ActivityEvent::SuspensionRegistered) => Self::Suspended,
            (Self::Suspended, ActivityEvent::DispatchSucceeded) => Self::Dispatched,
            (Self::Suspended, ActivityEvent::DispatchFailed) => Self::Suspended,
            (Self::Suspended | Self::Dispatched, ActivityEvent::Resumed) => Self::Resumed,
            (Self::Resumed, ActivityEvent::Completed) => Self::Completed,
            // Non-suspending activities complete straight from Created.
            (Self::Created, ActivityEvent::Completed) => Self::Completed,
            (state, _) => state,
        }
    }
}

impl std::fmt::Display for ActivityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Suspended => write!(f, "suspended"),
            Self::Dispatched => write!(f, "dispatched"),
            Self::Resumed => write!(f, "resumed"),
            Self::Completed => write!(f, "completed"),
        }
    }
}
