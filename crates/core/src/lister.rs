//! Manifest listers: where the per-package file lists come from.
//!
//! The conflict scan never opens a pak itself. It asks a [`ManifestLister`]
//! for the game-relative paths a package writes, which in production is an
//! external pak tool run once per package.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::archive_path::normalize;

pub const PAK_PLACEHOLDER: &str = "{pak}";

pub trait ManifestLister {
    fn list_files(&self, package: &Path) -> Result<Vec<String>>;
}

impl<F> ManifestLister for F
where
    F: Fn(&Path) -> Result<Vec<String>>,
{
    fn list_files(&self, package: &Path) -> Result<Vec<String>> {
        self(package)
    }
}

#[derive(Debug, Error)]
pub enum ListerError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status} for {package}: {stderr}")]
    ExitStatus {
        program: String,
        package: PathBuf,
        status: String,
        stderr: String,
    },
    #[error("{program} printed non UTF-8 output for {package}")]
    InvalidUtf8 { program: String, package: PathBuf },
}

/// Runs an external listing tool per package.
///
/// `{pak}` in `args` is replaced by the package path; without a placeholder
/// the path is appended as the last argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandLister {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CommandLister {
    fn default() -> Self {
        Self {
            program: "repak".to_string(),
            args: vec!["list".to_string(), PAK_PLACEHOLDER.to_string()],
        }
    }
}

impl CommandLister {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn command_args(&self, package: &Path) -> Vec<String> {
        let package = package.to_string_lossy();
        let mut substituted = false;
        let mut args = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(PAK_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(PAK_PLACEHOLDER, &package)
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>();
        if !substituted {
            args.push(package.to_string());
        }
        args
    }

    pub fn run(&self, package: &Path) -> std::result::Result<Vec<String>, ListerError> {
        let args = self.command_args(package);
        debug!(program = %self.program, ?args, "listing package contents");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ListerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ListerError::ExitStatus {
                program: self.program.clone(),
                package: package.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| ListerError::InvalidUtf8 {
            program: self.program.clone(),
            package: package.to_path_buf(),
        })?;
        Ok(parse_listing(&stdout))
    }
}

impl ManifestLister for CommandLister {
    fn list_files(&self, package: &Path) -> Result<Vec<String>> {
        Ok(self.run(package)?)
    }
}

/// One path per line; blank lines are dropped and separators normalised to `/`.
pub fn parse_listing(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(normalize)
        .filter(|line| !line.is_empty())
        .collect()
}
