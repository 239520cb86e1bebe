//! Temporary staging area and final placement of the generated client.
//!
//! A [`Workspace`] owns a temporary directory holding the normalized document and the
//! generator's output. It is deleted when dropped, whether or not the run succeeded.

use crate::patches::{FileRole, PatchReport, PatchSet};
use crate::serializer::{serialize_compact_json, write_to_file};
use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the normalized document inside the workspace.
pub const SCHEMA_FILE_NAME: &str = "api.sanitized.json";

/// Order in which patched files are copied to the target directory.
pub const PLACEMENT_ORDER: [FileRole; 5] = [
    FileRole::Entry,
    FileRole::Operations,
    FileRole::Base,
    FileRole::Common,
    FileRole::Configuration,
];

const GENERATED_DIR_NAME: &str = "generated";
const TEMP_DIR_PREFIX: &str = "openapi-client-patcher-";

/// Temporary directory for one pipeline run.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a fresh temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()
            .context("Failed to create temporary directory")?;
        debug!("Created workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Location of the normalized document handed to the generator.
    pub fn schema_path(&self) -> PathBuf {
        self.path().join(SCHEMA_FILE_NAME)
    }

    /// Directory the generator writes into.
    pub fn generated_dir(&self) -> PathBuf {
        self.path().join(GENERATED_DIR_NAME)
    }

    /// Writes the normalized document as compact JSON and returns its path.
    pub fn write_schema(&self, document: &Value) -> Result<PathBuf> {
        let path = self.schema_path();
        info!("Writing to {}", path.display());
        write_to_file(&serialize_compact_json(document)?, &path)?;
        Ok(path)
    }
}

/// Applies `set` to the file at `path`, rewriting it in place.
pub fn patch_file(path: &Path, set: &PatchSet) -> Result<PatchReport> {
    info!("Patching TypeScript file: {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read generated file: {}", path.display()))?;
    let outcome = set.apply(&content);
    fs::write(path, outcome.text)
        .with_context(|| format!("Failed to write patched file: {}", path.display()))?;

    Ok(outcome.report)
}

/// Patches the five generated files in `dir`, each exactly once.
///
/// Rules that match nothing are logged. With `strict`, the first file with an unmatched
/// rule aborts the run.
pub fn patch_generated_files(dir: &Path, strict: bool) -> Result<Vec<PatchReport>> {
    let mut reports = Vec::with_capacity(FileRole::ALL.len());

    for role in FileRole::ALL {
        let set = PatchSet::for_role(role)?;
        let report = patch_file(&dir.join(role.file_name()), &set)?;

        if strict {
            report.ensure_complete()?;
        } else {
            report.warn_unmatched();
        }
        reports.push(report);
    }

    Ok(reports)
}

/// Copies the five patched files from `from` into `target`.
///
/// The target directory is created if missing and existing files of the same name are
/// replaced.
pub fn place_files(from: &Path, target: &Path) -> Result<()> {
    info!("Ensuring target directory exists: {}", target.display());
    if !target.exists() {
        info!("Creating target directory: {}", target.display());
        fs::create_dir_all(target)
            .with_context(|| format!("Failed to create directory: {}", target.display()))?;
    }

    for role in PLACEMENT_ORDER {
        let file_name = role.file_name();
        let destination = target.join(file_name);

        if destination.exists() {
            info!("Removing existing file: {}", destination.display());
            fs::remove_file(&destination)
                .with_context(|| format!("Failed to remove {}", destination.display()))?;
        }

        info!("Copying {} to {}", file_name, target.display());
        fs::copy(from.join(file_name), &destination)
            .with_context(|| format!("Failed to copy {} to {}", file_name, target.display()))?;
    }

    Ok(())
}
