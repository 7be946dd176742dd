//! `sprout build` command implementation.
//!
//! Compiles the entry namespace once with advanced optimizations.

use sprout_core::error::SproutResult;

use super::launch::{launch, LaunchMode};
use super::CommandContext;

/// Execute the `sprout build` command
pub async fn execute(ctx: &CommandContext) -> SproutResult<()> {
    ctx.output.step("🌱", "Building project");
    launch(LaunchMode::Build, ctx).await
}
