//! `metasync compare` command

use anyhow::Result;

use super::print_json;
use metasync::core::change::ChangeStatus;
use metasync::ops::compare::compare;
use metasync::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, json: bool) -> Result<()> {
    let layout = ctx.layout();
    layout.ensure(ctx.fs())?;

    eprintln!(
        "   Comparing {} with {}",
        layout.source.display(),
        layout.destination.display()
    );
    let result = compare(ctx.fs(), &layout, ctx.config().api_version())?;

    if json {
        return print_json(&result);
    }

    let count = |status: ChangeStatus| {
        result
            .changes
            .iter()
            .filter(|c| c.status() == status)
            .count()
    };
    eprintln!(
        "     Changes {} added, {} changed, {} removed",
        count(ChangeStatus::Added),
        count(ChangeStatus::Changed),
        count(ChangeStatus::Removed)
    );
    for change in &result.changes {
        println!(
            "{:<8} {}/{}",
            change.status(),
            change.component_type(),
            change.name()
        );
    }

    eprintln!("       Delta {}", result.delta_manifest.display());
    if let Some(destructive) = &result.destructive_manifest {
        eprintln!(" Destructive {}", destructive.display());
    }
    eprintln!("         Log {}", result.diff_log.display());
    Ok(())
}
