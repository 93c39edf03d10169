//! The one operation: checkout, fetch, synthesize, write, format.

use crate::checkout;
use crate::cli::Cli;
use crate::config::Settings;
use crate::progress::{self, StepReporter};
use crate::runner;
use crate::ui;
use crate::Context as AppContext;
use anyhow::{Context, Result};
use declarative::{ResourceFile, Snapshot, Synthesizer};
use registry::{GitHubSecrets, HttpRegistry, Registry, ResourceKind, SecretsCatalog};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub fn run(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let settings = Settings::from_env().context("Failed to read settings")?;

    if !ctx.quiet {
        ui::header(&format!("airform: {}", settings.product));
        ui::kv("Repository", &settings.repository());
        ui::kv(
            "Environments",
            &settings.environments.iter().collect::<Vec<_>>().join(", "),
        );
        ui::kv("Reference", settings.environments.reference());
        println!();
    }

    if cli.no_clone {
        log::info!("Using existing checkout at {}", cli.workdir.display());
    } else {
        let pb = progress::spinner(&format!("Cloning {}", settings.repository()), ctx.quiet);
        if let Err(e) = checkout::clone(&settings.clone_url(), &cli.workdir) {
            progress::finish_error(&pb);
            return Err(e);
        }
        progress::finish_success(&pb, &format!("Cloned into {}", cli.workdir.display()));
    }

    let files = checkout::collect(&cli.workdir)?;
    if !ctx.quiet {
        summarize(&files);
    }

    let registries: HashMap<String, Box<dyn Registry>> = settings
        .endpoints
        .iter()
        .map(|endpoint| {
            let registry: Box<dyn Registry> = Box::new(HttpRegistry::new(
                endpoint.url.as_str(),
                &endpoint.client_id,
                &endpoint.client_secret,
            ));
            (endpoint.environment.clone(), registry)
        })
        .collect();

    let pb = progress::spinner("Fetching Airbyte resources", ctx.quiet);
    let snapshot = match Snapshot::fetch(&settings.environments, &registries) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            progress::finish_error(&pb);
            return Err(e).context("Failed to fetch Airbyte resources");
        }
    };
    progress::finish_success(&pb, "Fetched Airbyte resources");

    let pb = progress::spinner("Listing repository secrets", ctx.quiet);
    let secrets = match GitHubSecrets::new(settings.repository(), settings.github_token.as_str())
        .secret_names()
    {
        Ok(secrets) => secrets,
        Err(e) => {
            progress::finish_error(&pb);
            return Err(e).context("Failed to list repository secrets");
        }
    };
    progress::finish_success(
        &pb,
        &format!("Found {}", ui::count(secrets.len(), "secret", "secrets")),
    );

    let mut reporter = StepReporter::new(ctx.quiet);
    let text = Synthesizer::new(
        &settings.environments,
        &snapshot,
        &settings.product,
        &secrets,
    )
    .run_with_progress(&files, &mut reporter)
    .context("Synthesis failed, nothing was written")?;

    write_output(&cli.output, &text)?;
    if !ctx.quiet {
        ui::success(&format!("Wrote {}", cli.output.display()));
    }

    if !cli.no_fmt {
        format_output(&cli.output, ctx.quiet);
    }

    Ok(())
}

fn summarize(files: &[ResourceFile]) {
    let of_kind = |kind: ResourceKind| files.iter().filter(|f| f.kind == kind).count();
    ui::info(&format!(
        "Checkout declares {}, {} and {}",
        ui::count(of_kind(ResourceKind::Source), "source", "sources"),
        ui::count(of_kind(ResourceKind::Destination), "destination", "destinations"),
        ui::count(of_kind(ResourceKind::Connection), "connection", "connections"),
    ));
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Run `terraform fmt` on the written file. The file is complete either
/// way, so failures only warn.
fn format_output(path: &Path, quiet: bool) {
    if !runner::command_exists("terraform") {
        ui::warn("terraform not found, skipping fmt");
        return;
    }

    let target = path.to_string_lossy().into_owned();
    match runner::run_capture("terraform", &["fmt", target.as_str()]) {
        Ok(_) => {
            if !quiet {
                ui::dim(&format!("terraform fmt {target}"));
            }
        }
        Err(e) => ui::warn(&format!("terraform fmt failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_output_creates_parent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/nested/main.tf");
        write_output(&path, "terraform {}\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "terraform {}\n");
    }

    #[test]
    fn test_write_output_replaces_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("main.tf");
        fs::write(&path, "old").unwrap();
        write_output(&path, "new\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new\n");
    }
}
