//! `metasync deploy` command

use anyhow::{bail, Context, Result};

use super::print_json;
use crate::cli::DeployArgs;
use metasync::core::layout::ManifestKind;
use metasync::ops::deploy::{simulate_deploy, DeployOptions, TestLevel};
use metasync::util::GlobalContext;

pub fn execute(args: DeployArgs, ctx: &GlobalContext, json: bool) -> Result<()> {
    let opts = build_options(args, ctx)?;

    let layout = ctx.layout();
    layout.ensure(ctx.fs())?;

    eprintln!(
        "   Deploying with {}{}",
        opts.test_level,
        if opts.check_only { " (check only)" } else { "" }
    );
    let result = simulate_deploy(ctx.fs(), &layout.deploy_log(), &opts)?;

    if json {
        print_json(&result)?;
    } else {
        if !result.failed_components.is_empty() {
            eprintln!("      Failed {}", result.failed_components.join(", "));
        }
        if !result.retried_components.is_empty() {
            eprintln!("    Retrying {}", result.retried_components.join(", "));
        }
        eprintln!(
            "    Finished {} after {} attempt(s) (log: {})",
            result.status,
            result.attempts,
            result.log_path.display()
        );
    }

    if !result.status.is_success() {
        bail!(
            "deploy failed: {} failing component(s)",
            result.failed_components.len()
        );
    }
    Ok(())
}

/// Merge command-line flags with configured defaults.
fn build_options(args: DeployArgs, ctx: &GlobalContext) -> Result<DeployOptions> {
    let test_level = match &args.test_level {
        Some(level) => level
            .parse::<TestLevel>()
            .with_context(|| format!("invalid test level: {}", level))?,
        None => ctx.config().test_level().unwrap_or_default(),
    };

    let manifest_path = args
        .manifest
        .map(|p| ctx.cwd().join(p))
        .unwrap_or_else(|| ctx.layout().manifest(ManifestKind::Delta));

    Ok(DeployOptions {
        manifest_path: Some(manifest_path),
        components: args.components,
        test_level,
        run_tests: args.run_tests,
        check_only: args.check_only,
        auto_retry: ctx.config().auto_retry() && !args.no_auto_retry,
    })
}
