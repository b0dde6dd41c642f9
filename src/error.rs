//! Error type for a session run.
//!
//! Every variant is terminal for the run: nothing here is retried. A child
//! process exiting non-zero is not an error, it becomes the run's exit code.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// Required environment values are absent.
    #[error("missing required configuration: {}", keys.join(", "))]
    ConfigMissing { keys: Vec<String> },

    /// A configuration value is present but unusable.
    #[error("invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("failed to create session directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write session descriptor {}: {source}", path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child's combined output could not be set up or read.
    #[error("no output stream from subprocess: {source}")]
    StreamUnavailable {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to {}: {source}", path.display())]
    OutputLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for subprocess: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to echo output: {source}")]
    Console {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch messages: {0}")]
    Mail(#[source] anyhow::Error),

    #[error("selection prompt failed: {0}")]
    Prompt(#[source] anyhow::Error),
}
