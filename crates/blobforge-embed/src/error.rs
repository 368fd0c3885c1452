//! Embedding pipeline errors.

use std::path::PathBuf;

use blobforge_platform::PlatformError;
use thiserror::Error;

use crate::pipeline::PipelinePhase;

/// Errors that can occur during the embedding pipeline.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required external executable could not be located.
    #[error("required tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool was invoked and exited non-zero.
    #[error("command `{command}` failed with {status} (cwd: {}): {stderr}", cwd.display())]
    ToolInvocation {
        command: String,
        cwd: PathBuf,
        status: String,
        stderr: String,
    },

    /// Per-file emission failure, naming the payload that caused it.
    #[error("failed to embed '{source_file}': {source}")]
    EmitFailed {
        source_file: String,
        #[source]
        source: Box<EmbedError>,
    },

    /// The run was cancelled cooperatively.
    #[error("run aborted while {phase}")]
    Aborted { phase: PipelinePhase },
}
