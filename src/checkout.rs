//! Local checkout of the data product repository.
//!
//! Resources live under `airbyte/<kind>/<name>/configuration.yaml`, where
//! `<kind>` is `sources`, `destinations` or `connections`.

use crate::runner;
use anyhow::{Context, Result};
use declarative::ResourceFile;
use registry::ResourceKind;
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// File holding one resource's configuration.
pub const CONFIGURATION_FILE: &str = "configuration.yaml";

/// Folder of the checkout holding the resources.
pub const RESOURCES_DIR: &str = "airbyte";

/// Branch that is cloned.
pub const BRANCH: &str = "main";

/// Clone `url` into `dir`.
///
/// The clone lands in a staging folder next to `dir` first. An existing
/// `dir` is replaced only once the clone succeeded, and only if it is a git
/// checkout that does not contain the current directory.
pub fn clone(url: &str, dir: &Path) -> Result<()> {
    if dir.exists() {
        ensure_replaceable(dir)?;
    }

    let parent = match dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let staging = tempfile::Builder::new()
        .prefix(".airform-clone-")
        .tempdir_in(parent)
        .with_context(|| format!("Failed to create a staging folder in {}", parent.display()))?;
    let fresh = staging.path().join("checkout");
    let target = fresh.to_string_lossy().into_owned();
    runner::run_capture("git", &["clone", "--branch", BRANCH, url, target.as_str()])
        .with_context(|| format!("Failed to clone {url}"))?;

    let previous = staging.path().join("previous");
    let replaced = dir.exists();
    if replaced {
        log::debug!("Moving previous checkout at {} aside", dir.display());
        fs::rename(dir, &previous)
            .with_context(|| format!("Failed to move {} aside", dir.display()))?;
    }

    if let Err(e) = fs::rename(&fresh, dir) {
        if replaced {
            let _ = fs::rename(&previous, dir);
        }
        return Err(e).with_context(|| format!("Failed to move the clone to {}", dir.display()));
    }
    Ok(())
}

/// Only a git checkout that does not hold the current directory may be
/// replaced.
fn ensure_replaceable(dir: &Path) -> Result<()> {
    if !dir.join(".git").exists() {
        anyhow::bail!(
            "Refusing to replace {}: it is not a git checkout",
            dir.display()
        );
    }

    let dir = dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", dir.display()))?;
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    if cwd.canonicalize().unwrap_or(cwd).starts_with(&dir) {
        anyhow::bail!(
            "Refusing to replace {}: it contains the current directory",
            dir.display()
        );
    }
    Ok(())
}

/// Every resource file of a checkout, in path order.
pub fn collect(dir: &Path) -> Result<Vec<ResourceFile>> {
    let root = dir.join(RESOURCES_DIR);
    if !root.is_dir() {
        anyhow::bail!("No {RESOURCES_DIR}/ folder in {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() || entry.file_name() != CONFIGURATION_FILE {
            continue;
        }

        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        let Some((kind, label)) = classify(relative) else {
            log::debug!("Ignoring {}", entry.path().display());
            continue;
        };

        files.push(load(entry.path(), kind, label)?);
    }

    log::info!("Found {} resource files in {}", files.len(), root.display());
    Ok(files)
}

/// Kind and label of a path relative to the resources folder, such as
/// `sources/orders api/configuration.yaml`.
pub fn classify(relative: &Path) -> Option<(ResourceKind, String)> {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let index = parts
        .iter()
        .position(|part| ResourceKind::from_plural(part).is_some())?;
    let kind = ResourceKind::from_plural(&parts[index])?;

    // The label folder must sit between the kind folder and the file.
    let label = parts.get(index + 1)?;
    if index + 2 >= parts.len() {
        return None;
    }
    Some((kind, label.clone()))
}

fn load(path: &Path, kind: ResourceKind, label: String) -> Result<ResourceFile> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content: serde_json::Value = serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if !content.is_object() {
        anyhow::bail!("{} is not a mapping", path.display());
    }

    log::debug!("Loaded {kind} {label}");
    Ok(ResourceFile::new(kind, label, content))
}
