//! parse command - show how a key is classified

use super::CommandContext;
use crate::utils::render;
use anyhow::Result;
use hieraldap_core::types::{LookupKey, QueryExpression};
use serde::Serialize;

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ParsedKey {
    Direct {
        #[serde(flatten)]
        query: QueryExpression,
        url: String,
    },
    Indirect {
        key: String,
    },
}

pub fn execute(ctx: &CommandContext, key: &str) -> Result<()> {
    let parsed = match LookupKey::classify(key)? {
        LookupKey::Direct(query) => ParsedKey::Direct {
            url: query.to_string(),
            query,
        },
        LookupKey::Indirect(key) => ParsedKey::Indirect { key },
    };

    ctx.info(&render(&parsed, ctx.output_format)?);
    Ok(())
}
