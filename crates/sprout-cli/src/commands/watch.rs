//! `sprout watch` command implementation.

use sprout_core::error::SproutResult;

use super::launch::{launch, LaunchMode};
use super::CommandContext;

/// Execute the `sprout watch` command
pub async fn execute(ctx: &CommandContext) -> SproutResult<()> {
    ctx.output.step("👀", "Watching for changes");
    launch(LaunchMode::Watch, ctx).await
}
