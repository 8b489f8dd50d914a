//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// metasync - compare metadata workspaces, build delta manifests and
/// simulate deploys
#[derive(Parser)]
#[command(name = "metasync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print result records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, env = "METASYNC_PROJECT")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate or inspect package manifests
    Manifest(ManifestArgs),

    /// Retrieve components into the source or destination workspace
    Retrieve(RetrieveArgs),

    /// Diff source against destination and build delta manifests
    Compare,

    /// Run a simulated deploy
    Deploy(DeployArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ManifestArgs {
    #[command(subcommand)]
    pub command: ManifestCommands,
}

#[derive(Subcommand)]
pub enum ManifestCommands {
    /// Render and save a manifest
    Generate(GenerateArgs),

    /// Print the project's manifests
    Show,
}

/// Component types given on the command line.
#[derive(Args)]
pub struct TypeArgs {
    /// Component type with members, e.g. `CustomObject=Account,Contact`
    #[arg(long = "type", value_name = "TYPE[=MEMBERS]")]
    pub types: Vec<String>,

    /// JSON file with `[{"name": ..., "members": [...]}]`
    #[arg(long, value_name = "FILE")]
    pub types_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Manifest to generate (source, destination, delta)
    pub kind: String,

    #[command(flatten)]
    pub types: TypeArgs,
}

#[derive(Args)]
pub struct RetrieveArgs {
    /// Workspace to retrieve into (source, destination)
    pub target: String,

    #[command(flatten)]
    pub types: TypeArgs,
}

#[derive(Args)]
pub struct DeployArgs {
    /// Manifest to deploy (defaults to the project's delta manifest)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Explicit component to deploy (overrides the manifest)
    #[arg(long = "component", value_name = "NAME")]
    pub components: Vec<String>,

    /// Test level (NoTestRun, RunSpecifiedTests, RunLocalTests, RunAllTestsInOrg)
    #[arg(long)]
    pub test_level: Option<String>,

    /// Tests to run, comma separated
    #[arg(long, value_delimiter = ',')]
    pub run_tests: Vec<String>,

    /// Validate without deploying
    #[arg(long)]
    pub check_only: bool,

    /// Do not retry without the failing components
    #[arg(long)]
    pub no_auto_retry: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
