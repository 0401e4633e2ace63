//! CLI failures and the exit code each one maps to.
//!
//! - 0:  success
//! - 2:  clap arg parse error (before `run`)
//! - 10: engine construction (unknown engine, bad dimensions, out-of-range param)
//! - 11: snapshot could not be written
//! - 12: bad user input (`--key` script, `--params` JSON, weather name)
//! - 13: report could not be serialized

use comfort_field_core::EngineError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(EngineError),

    /// Writing a PNG failed.
    #[error("cannot write snapshot {}: {reason}", path.display())]
    Snapshot { path: PathBuf, reason: String },

    /// A `--key FRAME:KEY` argument did not parse.
    #[error("invalid --key '{arg}': {reason}")]
    KeyScript { arg: String, reason: &'static str },

    /// `--params` was not a usable JSON object.
    #[error("invalid --params: {0}")]
    Params(String),

    /// `--weather` (or `weather` in `--params`) named no mode.
    #[error("unknown weather '{0}': expected sunny, rain, heat or a key 1-3")]
    Weather(String),

    #[error("cannot serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(EngineError::Io(_)) | CliError::Snapshot { .. } => 11,
            CliError::Engine(_) => 10,
            CliError::KeyScript { .. } | CliError::Params(_) | CliError::Weather(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// Attributes a snapshot failure to `path`; non-I/O engine errors pass through.
    pub fn snapshot(path: &Path, err: EngineError) -> Self {
        match err {
            EngineError::Io(reason) => CliError::Snapshot {
                path: path.to_path_buf(),
                reason,
            },
            other => other.into(),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::UnknownWeather(name) => CliError::Weather(name),
            other => CliError::Engine(other),
        }
    }
}
