//! lookup command - resolve a key against the directory

use super::CommandContext;
use crate::utils::{parse_var, render};
use anyhow::Result;
use colored::Colorize;
use hieraldap_lookup::{select_value, LookupContext, LookupEngine};
use tracing::debug;

/// Returns whether the key was found
pub async fn execute(
    ctx: &CommandContext,
    key: &str,
    select: Option<&str>,
    vars: &[String],
) -> Result<bool> {
    let mut options = ctx.options.clone();
    for var in vars {
        let (name, value) = parse_var(var)?;
        options.variables.insert(name, value);
    }

    ctx.debug(&format!("Looking up {} on {}", key, options.endpoint().url()));

    let engine = LookupEngine::with_default_connector()?;
    let context = LookupContext::new();

    let value = match engine.lookup(key, &options, &context).await? {
        Some(value) => value,
        None => {
            if !ctx.quiet {
                ctx.error(&format!("{} {}", "Not found:".yellow(), key));
            }
            return Ok(false);
        }
    };

    debug!("Resolved {} ({} cached keys)", key, context.len());
    for warning in context.warnings() {
        ctx.debug(&format!("warning: {}", warning));
    }

    let output = match select {
        Some(attr) => render(&select_value(&value, attr)?, ctx.output_format)?,
        None => render(&value, ctx.output_format)?,
    };
    ctx.info(&output);

    Ok(true)
}
