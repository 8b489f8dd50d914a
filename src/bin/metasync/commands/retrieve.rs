//! `metasync retrieve` command

use anyhow::{Context, Result};

use super::{load_types, print_json};
use crate::cli::RetrieveArgs;
use metasync::core::layout::RetrieveTarget;
use metasync::ops::retrieve::retrieve;
use metasync::util::GlobalContext;

pub fn execute(args: RetrieveArgs, ctx: &GlobalContext, json: bool) -> Result<()> {
    let target: RetrieveTarget = args
        .target
        .parse()
        .with_context(|| format!("invalid retrieve target: {}", args.target))?;
    let types = load_types(&args.types, ctx)?;

    let layout = ctx.layout();
    layout.ensure(ctx.fs())?;

    eprintln!("  Retrieving {} component types into {}", types.len(), target);
    let result = retrieve(ctx.fs(), target.as_str(), layout.workspace(target), &types)?;

    if json {
        return print_json(&result);
    }

    for entry in &result.entries {
        if ctx.is_verbose() {
            eprintln!(
                "   Retrieved {}:{} -> {}",
                entry.component_type,
                entry.member,
                entry.file_path.display()
            );
        }
    }
    eprintln!(
        "    Finished retrieving {} components (log: {})",
        result.entries.len(),
        result.log_path.display()
    );
    Ok(())
}
