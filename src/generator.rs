//! Invocation of the external client generator.
//!
//! The generator is `openapi-generator-cli` with the `typescript-axios` target. Only its
//! input (the normalized JSON document) and its output directory matter here.

use crate::error::{Error, Result};
use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable name used when no project-local install is found.
pub const DEFAULT_GENERATOR: &str = "openapi-generator-cli";

const GENERATOR_TARGET: &str = "typescript-axios";
const ADDITIONAL_PROPERTIES: &str = "--additional-properties=enumPropertyNaming=original";

/// A single generator run.
#[derive(Debug, Clone)]
pub struct GeneratorCommand {
    program: PathBuf,
    input: PathBuf,
    output_dir: PathBuf,
}

impl GeneratorCommand {
    pub fn new(program: PathBuf, input: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            program,
            input,
            output_dir,
        }
    }

    /// Arguments passed to the generator, in order.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("generate"),
            OsString::from("-i"),
            self.input.clone().into_os_string(),
            OsString::from("-g"),
            OsString::from(GENERATOR_TARGET),
            OsString::from(ADDITIONAL_PROPERTIES),
            OsString::from("-o"),
            self.output_dir.clone().into_os_string(),
        ]
    }

    /// The full command line, for logging.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args().iter().map(|arg| arg.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    /// Runs the generator with inherited stdio and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Generator`] if the program cannot be started or exits unsuccessfully.
    pub fn run(&self) -> Result<()> {
        info!("Running command: {}", self.display());

        let status = Command::new(&self.program)
            .args(self.args())
            .status()
            .map_err(|e| {
                Error::Generator(format!("failed to start {}: {}", self.program.display(), e))
            })?;

        if !status.success() {
            return Err(Error::Generator(format!(
                "{} exited with {}",
                self.program.display(),
                status
            )));
        }

        debug!("Generator finished, output in {}", self.output_dir.display());
        Ok(())
    }
}

/// Finds the project-local generator under the enclosing git repository.
///
/// Walks up from `start` to the first directory containing `.git` and returns
/// `node_modules/.bin/openapi-generator-cli` below it if that file exists.
pub fn locate_generator(start: &Path) -> Option<PathBuf> {
    let root = start.ancestors().find(|dir| dir.join(".git").exists())?;
    let candidate = root
        .join("node_modules")
        .join(".bin")
        .join(DEFAULT_GENERATOR);

    if candidate.is_file() {
        debug!("Using project generator at {}", candidate.display());
        Some(candidate)
    } else {
        None
    }
}
