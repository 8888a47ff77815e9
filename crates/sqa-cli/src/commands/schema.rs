use anyhow::Context;
use sqa_schema::SchemaRegistry;

use crate::cli::{GlobalFlags, OutputFormat, SchemaArgs};
use crate::output::output;

/// Handle `sqa schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();

    if args.list {
        return output(&registry.list(), flags.format);
    }

    let name = args
        .name
        .as_deref()
        .context("a schema name is required unless --list is given")?;
    let schema = registry.get(name).with_context(|| {
        format!(
            "unknown schema '{name}' (available: {})",
            registry.list().join(", ")
        )
    })?;

    // A schema is a document, not a record: tables would flatten it.
    let rendered = match flags.format {
        OutputFormat::Raw => serde_json::to_string(schema)?,
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(schema)?,
    };
    println!("{rendered}");
    Ok(())
}
