//! `sprout nrepl` command implementation.
//!
//! `nrepl/nrepl` must be on the classpath, either declared in the manifest
//! or pulled in by the `--cider` dependencies.

use sprout_core::error::SproutResult;

use super::launch::{launch, LaunchMode};
use super::CommandContext;

/// Execute the `sprout nrepl` command
pub async fn execute(ctx: &CommandContext) -> SproutResult<()> {
    let cider = ctx.settings.cider;
    if cider {
        ctx.output.step("🔌", "Starting nREPL server with CIDER middleware");
    } else {
        ctx.output.step("🔌", "Starting nREPL server");
    }
    launch(LaunchMode::Nrepl { cider }, ctx).await
}
