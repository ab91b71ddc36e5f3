//! options command - show the effective options

use super::CommandContext;
use crate::utils::render;
use anyhow::Result;
use hieraldap_core::utils::redact;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let mut options = ctx.options.clone();
    options.bind_password = redact(&options.bind_password).to_string();

    if let Err(e) = options.validate() {
        ctx.error(&format!("warning: {}", e));
    }

    ctx.info(&render(&options, ctx.output_format)?);
    Ok(())
}
