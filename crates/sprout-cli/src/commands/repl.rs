//! `sprout repl` command implementation.
//!
//! Compiles the entry namespace and starts a browser REPL on the configured
//! host and port.

use sprout_core::error::SproutResult;

use super::launch::{launch, LaunchMode};
use super::CommandContext;

/// Execute the `sprout repl` command
pub async fn execute(ctx: &CommandContext) -> SproutResult<()> {
    ctx.output.step("💬", "Starting REPL");
    launch(LaunchMode::Repl, ctx).await
}
