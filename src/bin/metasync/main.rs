//! metasync CLI - compare metadata workspaces and simulate deploys

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use metasync::util::GlobalContext;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("metasync=debug")
    } else {
        EnvFilter::new("metasync=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let project_root = cli.project.clone().unwrap_or_else(|| cwd.clone());
    let mut ctx = GlobalContext::with_project(cwd, project_root);
    ctx.set_verbose(cli.verbose);

    // Execute command
    match cli.command {
        Commands::Manifest(args) => commands::manifest::execute(args, &ctx, cli.json),
        Commands::Retrieve(args) => commands::retrieve::execute(args, &ctx, cli.json),
        Commands::Compare => commands::compare::execute(&ctx, cli.json),
        Commands::Deploy(args) => commands::deploy::execute(args, &ctx, cli.json),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
