//! Boolean branch evaluation over structured values
//!
//! Routes a flow to a `True` or `False` edge by looking for a boolean
//! `Decided` flag at the top level of a JSON value or on one of its direct
//! children. The search depth is fixed at exactly two levels; anything
//! nested deeper is invisible.

use serde_json::Value;
use thiserror::Error;
use waypost_core::{ActivityContext, Outcome, Result};

use crate::{Activity, ActivityProfile};

/// Field name the evaluator searches for.
pub const DECIDED_FIELD: &str = "Decided";

/// Why a value could not be evaluated.
///
/// These never reach the host: the fail-safe wrappers fold them into the
/// `False` outcome. They are typed so tests can tell "legitimately false"
/// apart from "unparsable".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("Input is not a JSON object")]
    NotAnObject,

    #[error("Input is not valid JSON: {0}")]
    Unparsable(String),
}

/// Search for `Decided: true` at the top level or one level down.
///
/// First match wins. A child only counts if it is itself an object, and
/// the flag must be a real boolean; `1` or `"true"` do not match.
pub fn evaluate(value: &Value) -> std::result::Result<bool, DecisionError> {
    let map = value.as_object().ok_or(DecisionError::NotAnObject)?;

    if let Some(Value::Bool(true)) = map.get(DECIDED_FIELD) {
        return Ok(true);
    }

    for child in map.values() {
        if let Some(object) = child.as_object() {
            if let Some(Value::Bool(true)) = object.get(DECIDED_FIELD) {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Evaluate raw text that should contain a JSON object.
pub fn evaluate_str(raw: &str) -> std::result::Result<bool, DecisionError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecisionError::Unparsable(e.to_string()))?;
    evaluate(&value)
}

/// Fail-safe outcome selection: any evaluation error degrades to `False`.
pub fn decide(value: &Value) -> Outcome {
    Outcome::from_bool(evaluate(value).unwrap_or(false))
}

/// Branching activity around [`evaluate`].
///
/// Synchronous and side-effect-free apart from completing with an outcome;
/// flow-control nodes can also call [`decide`] directly.
pub struct FlowDecision {
    condition: Value,
}

impl FlowDecision {
    /// Evaluate a structured condition value.
    pub fn new(condition: Value) -> Self {
        Self { condition }
    }

    /// Wrap an already-computed boolean in the `Decided` convention.
    pub fn from_bool(decided: bool) -> Self {
        Self {
            condition: serde_json::json!({ DECIDED_FIELD: decided }),
        }
    }
}

#[async_trait::async_trait]
impl Activity for FlowDecision {
    fn name(&self) -> &str {
        "flow_decision"
    }

    fn profile(&self) -> ActivityProfile {
        ActivityProfile::default()
    }

    async fn execute(&self, ctx: &mut dyn ActivityContext) -> Result<()> {
        let outcome = match evaluate(&self.condition) {
            Ok(decided) => Outcome::from_bool(decided),
            Err(reason) => {
                tracing::debug!("Decision input defaulted to False: {}", reason);
                Outcome::False
            }
        };

        ctx.complete_with_outcome(outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use waypost_core::{ActivityState, MemoryHost};

    #[test]
    fn test_top_level_decided_true() {
        assert_eq!(decide(&json!({ "Decided": true })), Outcome::True);
    }

    #[test]
    fn test_nested_decided_true() {
        assert_eq!(decide(&json!({ "Foo": { "Decided": true } })), Outcome::True);
    }

    #[test]
    fn test_any_true_match_at_level_two_wins() {
        let value = json!({
            "Foo": { "Decided": false },
            "Bar": { "Decided": true }
        });
        assert_eq!(decide(&value), Outcome::True);
    }

    #[test]
    fn test_non_object_child_is_skipped() {
        assert_eq!(decide(&json!({ "Foo": "not an object" })), Outcome::False);
    }

    #[test]
    fn test_top_level_false_does_not_stop_the_scan() {
        let value = json!({
            "Decided": false,
            "Inner": { "Decided": true }
        });
        assert_eq!(decide(&value), Outcome::True);
    }

    #[test]
    fn test_third_level_is_invisible() {
        let value = json!({ "A": { "B": { "Decided": true } } });
        assert_eq!(decide(&value), Outcome::False);
    }

    #[test]
    fn test_only_real_booleans_match() {
        assert_eq!(decide(&json!({ "Decided": 1 })), Outcome::False);
        assert_eq!(decide(&json!({ "Decided": "true" })), Outcome::False);
        assert_eq!(decide(&json!({ "Foo": { "Decided": "true" } })), Outcome::False);
    }

    #[test]
    fn test_malformed_input_degrades_to_false() {
        assert_eq!(decide(&json!("just a string")), Outcome::False);
        assert_eq!(decide(&json!([1, 2, 3])), Outcome::False);
        assert_eq!(decide(&Value::Null), Outcome::False);
    }

    #[test]
    fn test_errors_are_typed_internally() {
        assert_eq!(evaluate(&json!(42)), Err(DecisionError::NotAnObject));
        assert_eq!(evaluate(&json!({ "Decided": false })), Ok(false));
        assert!(matches!(
            evaluate_str("{ not json"),
            Err(DecisionError::Unparsable(_))
        ));
        assert_eq!(evaluate_str(r#"{"Decided": true}"#), Ok(true));
    }

    #[tokio::test]
    async fn test_activity_completes_with_outcome() {
        let host = MemoryHost::new();
        let mut ctx = host.context();

        FlowDecision::new(json!({ "Decided": true }))
            .execute(&mut ctx)
            .await
            .unwrap();

        assert_eq!(ctx.outcome(), Some(Outcome::True));
        assert_eq!(ctx.state(), ActivityState::Completed);
    }

    #[tokio::test]
    async fn test_from_bool_round_trip() {
        let host = MemoryHost::new();

        let mut ctx = host.context();
        FlowDecision::from_bool(false).execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.outcome(), Some(Outcome::False));

        let mut ctx = host.context();
        FlowDecision::from_bool(true).execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.outcome(), Some(Outcome::True));
    }
}
