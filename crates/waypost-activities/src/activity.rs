//! Activity contract
//!
//! The host invokes activities cooperatively, one logical step of one
//! instance at a time, across many concurrent instances. Activities hold no
//! shared mutable state between invocations; everything instance-specific
//! flows through the [`ActivityContext`].

use async_trait::async_trait;
use waypost_core::{ActivityContext, Continuation, Result, WaypostError};

/// What an activity can do, declared up front.
///
/// Variants of the activity family differ only in which capabilities they
/// carry, so the profile replaces a base-class hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityProfile {
    /// Writes a value to its declared result slot.
    pub produces_output: bool,
    /// Reads the payload delivered with an external completion signal.
    pub consumes_resume_input: bool,
    /// May register a suspension and end its turn without completing.
    pub may_suspend: bool,
}

/// A plug-in unit of work inside the host's execution graph.
#[async_trait]
pub trait Activity: Send + Sync {
    /// Stable activity type name.
    fn name(&self) -> &str;

    /// Capability profile for this activity.
    fn profile(&self) -> ActivityProfile;

    /// Run one turn.
    ///
    /// Suspending activities register a stimulus and return without
    /// completing; everything else completes before returning. An error
    /// here is fatal for the activity.
    async fn execute(&self, ctx: &mut dyn ActivityContext) -> Result<()>;

    /// Invoked by the host when a previously registered stimulus matches.
    ///
    /// May run on a different thread, process, or machine than the
    /// original turn; the continuation descriptor is the only state that
    /// crossed over. The default rejects the call: an activity that never
    /// suspends can never be resumed.
    async fn resume(
        &self,
        ctx: &mut dyn ActivityContext,
        continuation: &Continuation,
    ) -> Result<()> {
        let _ = (ctx, continuation);
        Err(WaypostError::UnexpectedResume(self.name().to_string()))
    }
}
