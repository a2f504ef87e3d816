//! Run-task round trip against the in-memory host
//!
//! Registers a suspension, "dispatches" through a dispatcher that logs
//! instead of calling out, then plays the external completion signal back
//! and prints the delivered result.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use waypost_activities::{Activity, RunTask, RUN_TASK_INPUT_KEY};
use waypost_core::{MemoryHost, TaskRequest, UuidGenerator};
use waypost_dispatch::{DispatchError, TaskDispatcher};

struct LoggingDispatcher;

#[async_trait]
impl TaskDispatcher for LoggingDispatcher {
    async fn dispatch(
        &self,
        request: &TaskRequest,
        _cancel: &CancellationToken,
    ) -> std::result::Result<(), DispatchError> {
        info!(
            "Would notify webhook: task '{}' ({})",
            request.task_name, request.task_id
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let host = MemoryHost::new();
    let mut payload = BTreeMap::new();
    payload.insert("poNumber".to_string(), Value::from("PO-77"));

    let activity = RunTask::new(
        "approve-po",
        Arc::new(LoggingDispatcher),
        Arc::new(UuidGenerator),
    )
    .with_payload(payload)
    .with_route_url("/tasks/approve");

    let mut ctx = host.context();
    activity.execute(&mut ctx).await?;
    info!(
        "Activity is {} with {} suspension registered",
        ctx.state(),
        host.suspension_count()
    );

    // The external system fulfills the task and reports back.
    let record = host.suspensions().pop().expect("a suspension is registered");
    let delivered = host.deliver(&record.stimulus).expect("signal matches");
    ctx.begin_resume(HashMap::from([(
        RUN_TASK_INPUT_KEY.to_string(),
        json!({ "approved": true, "approver": "m.garcia" }),
    )]));
    activity.resume(&mut ctx, &delivered.continuation).await?;

    info!(
        "Activity is {} with result {}",
        ctx.state(),
        ctx.result().expect("result delivered")
    );
    Ok(())
}
