//! Shared CLI types: error kinds, exit codes and input helpers.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::LayoutProfile;

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Invalid input or configuration
    ValidationError = 1,
    /// File system or external tool failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Category of a CLI failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// Bad arguments, bad config or unusable input content
    Validation,
    /// Unreadable/unwritable files or a failing collaborator
    Io,
}

/// Error returned by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Failure category, decides the exit code
    pub kind: CliErrorKind,
    /// Message printed after `Error:`
    pub message: String,
}

impl CliError {
    /// Creates a validation error (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Validation,
            message: message.into(),
        }
    }

    /// Creates an I/O error (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Io,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.kind {
            CliErrorKind::Validation => ExitCode::ValidationError,
            CliErrorKind::Io => ExitCode::IoError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Picks the argument if given, else the configured default.
///
/// Fails with a validation error naming the flag when neither is set.
pub fn required_path(
    arg: Option<&PathBuf>,
    configured: Option<&PathBuf>,
    flag: &str,
) -> CliResult<PathBuf> {
    arg.or(configured).cloned().ok_or_else(|| {
        CliError::validation(format!(
            "No {flag} given (pass --{flag} or set paths.{flag} in the config file)"
        ))
    })
}

/// Effective layout profile: the `--profile` name if given, else the
/// configured profile with its overrides.
pub fn resolve_profile(config: &Config, name: Option<&str>) -> CliResult<LayoutProfile> {
    let result = match name {
        Some(name) => {
            let mut profile_config = config.profile.clone();
            profile_config.name = name.to_string();
            profile_config.resolve()
        }
        None => config.profile.resolve(),
    };
    result.map_err(|e| CliError::validation(format!("{e:#}")))
}

/// Output directory: the argument if given, else the configured one.
#[must_use]
pub fn output_dir(arg: Option<&PathBuf>, config: &Config) -> PathBuf {
    arg.cloned().unwrap_or_else(|| config.paths.output_dir())
}

/// Creates the output directory.
pub fn ensure_dir(dir: &Path) -> CliResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        CliError::io(format!(
            "Failed to create output directory {}: {e}",
            dir.display()
        ))
    })
}
