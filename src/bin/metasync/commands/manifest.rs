//! `metasync manifest` command

use anyhow::{Context, Result};
use serde::Serialize;

use super::{load_types, print_json};
use crate::cli::{GenerateArgs, ManifestArgs, ManifestCommands};
use metasync::core::component::ComponentType;
use metasync::core::layout::ManifestKind;
use metasync::core::manifest::save_manifest;
use metasync::util::GlobalContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedManifest<'a> {
    kind: ManifestKind,
    path: String,
    api_version: &'a str,
    types: &'a [ComponentType],
}

#[derive(Serialize)]
struct ShownManifest {
    kind: ManifestKind,
    path: String,
    content: String,
}

pub fn execute(args: ManifestArgs, ctx: &GlobalContext, json: bool) -> Result<()> {
    match args.command {
        ManifestCommands::Generate(args) => generate(args, ctx, json),
        ManifestCommands::Show => show(ctx, json),
    }
}

fn generate(args: GenerateArgs, ctx: &GlobalContext, json: bool) -> Result<()> {
    let kind: ManifestKind = args
        .kind
        .parse()
        .with_context(|| format!("invalid manifest kind: {}", args.kind))?;
    let types = load_types(&args.types, ctx)?;

    let layout = ctx.layout();
    layout.ensure(ctx.fs())?;

    let path = layout.manifest(kind);
    let api_version = ctx.config().api_version();
    save_manifest(ctx.fs(), &path, &types, api_version)?;

    if json {
        return print_json(&GeneratedManifest {
            kind,
            path: path.display().to_string(),
            api_version,
            types: &types,
        });
    }

    eprintln!(
        "   Generated {} manifest ({} types) at {}",
        kind,
        types.len(),
        path.display()
    );
    Ok(())
}

fn show(ctx: &GlobalContext, json: bool) -> Result<()> {
    let layout = ctx.layout();
    let mut shown = Vec::new();

    for kind in ManifestKind::ALL {
        let path = layout.manifest(kind);
        // Missing manifests show as empty
        let content = if ctx.fs().exists(&path) {
            ctx.fs()
                .read_to_string(&path)
                .with_context(|| format!("failed to read manifest: {}", path.display()))?
        } else {
            String::new()
        };
        shown.push(ShownManifest {
            kind,
            path: path.display().to_string(),
            content,
        });
    }

    if json {
        return print_json(&shown);
    }

    for manifest in &shown {
        println!("== {} ({})", manifest.kind, manifest.path);
        if !manifest.content.is_empty() {
            println!("{}", manifest.content);
        }
    }
    Ok(())
}
