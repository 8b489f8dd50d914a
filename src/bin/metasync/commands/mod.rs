//! Command implementations

pub mod compare;
pub mod completions;
pub mod deploy;
pub mod manifest;
pub mod retrieve;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::TypeArgs;
use metasync::core::component::{default_types, ComponentType};
use metasync::util::GlobalContext;

/// Component types from `--types-file` and `--type`, in that order.
///
/// Falls back to the default sample types when neither is given.
pub fn load_types(args: &TypeArgs, ctx: &GlobalContext) -> Result<Vec<ComponentType>> {
    let mut types = Vec::new();

    if let Some(path) = &args.types_file {
        let path = ctx.cwd().join(path);
        let contents = ctx
            .fs()
            .read_to_string(&path)
            .with_context(|| format!("failed to read types file: {}", path.display()))?;
        let parsed: Vec<ComponentType> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse types file: {}", path.display()))?;
        types.extend(parsed);
    }

    for spec in &args.types {
        let ty: ComponentType = spec
            .parse()
            .with_context(|| format!("invalid --type: {}", spec))?;
        types.push(ty);
    }

    if types.is_empty() {
        tracing::debug!("no component types given, using defaults");
        types = default_types();
    }
    Ok(types)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
