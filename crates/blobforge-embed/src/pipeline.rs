//! Embedding pipeline orchestrator.
//!
//! Runs discover -> emit (per payload) -> assemble as a single pass over
//! the input directory. Emission order follows the sorted discovery set and
//! the archiver runs only after every emission completed, so results are
//! deterministic. The run is stateless: nothing persists between
//! invocations and re-running on unchanged inputs reproduces the archive.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use blobforge_platform::PlatformProfile;

use crate::archive::assemble;
use crate::discover::discover;
use crate::emit::{emitter_for, EmitStrategy, ObjectEmitter};
use crate::error::EmbedError;
use crate::report::EmbedReport;
use crate::toolchain::{PathTranslation, ToolchainContext};

/// Failure handling policy for per-file emission errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Abort the whole run on the first failure. A partially built archive
    /// is worse than no archive.
    #[default]
    FailFast,
    /// Attempt every payload, collect failures, and skip the archive step
    /// if any emission failed.
    BestEffort,
}

/// The pipeline stage a run was in when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Discovering,
    Emitting,
    Assembling,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discovering => "discovering inputs",
            Self::Emitting => "emitting objects",
            Self::Assembling => "assembling archive",
        })
    }
}

/// Cooperative cancellation handle, shared between the caller and the run.
///
/// Checked between per-file emissions; an in-flight external invocation is
/// allowed to finish, and partially written files are left in place for
/// inspection.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One collected per-file failure from a best-effort run.
#[derive(Debug)]
pub struct EmbedFailure {
    /// File name of the payload that failed.
    pub source_file: String,
    /// What went wrong.
    pub error: EmbedError,
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Active platform profile.
    pub profile: PlatformProfile,
    /// Emission strategy.
    pub strategy: EmitStrategy,
    /// Directory containing the payload files.
    pub input_dir: PathBuf,
    /// Output directory; defaults to `obj/` under the input directory.
    pub output_dir: Option<PathBuf>,
    /// Logical library name the archive pattern is applied to.
    pub lib_name: String,
    /// Optional directory prepended to executable search for this run.
    pub toolchain_dir: Option<PathBuf>,
    /// Path rendering for external command arguments.
    pub translation: PathTranslation,
    /// Failure handling policy.
    pub mode: RunMode,
    /// Print per-file progress detail.
    pub verbose: bool,
    /// Cooperative cancellation handle.
    pub cancel: CancelToken,
}

impl PipelineConfig {
    /// Default configuration for a profile and input directory.
    pub fn new(profile: PlatformProfile, input_dir: PathBuf) -> Self {
        Self {
            profile,
            strategy: EmitStrategy::default(),
            input_dir,
            output_dir: None,
            lib_name: "v8_data".to_string(),
            toolchain_dir: None,
            translation: PathTranslation::default(),
            mode: RunMode::default(),
            verbose: false,
            cancel: CancelToken::new(),
        }
    }

    fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.input_dir.join("obj"))
    }
}

/// Resolve every external tool the run will need, before any file is
/// processed. A missing toolchain must surface immediately, not as a
/// partial run.
pub fn preflight(ctx: &ToolchainContext, emitter: &dyn ObjectEmitter) -> Result<(), EmbedError> {
    for tool in emitter.required_tools() {
        ctx.find_tool(tool)?;
    }
    ctx.find_tool(ctx.profile.archiver)?;
    Ok(())
}

/// Run the embedding pipeline.
///
/// Returns a report on success, including a best-effort run that collected
/// failures (the archive step is skipped in that case and the report says
/// so). Fail-fast runs return the first error directly, wrapped with the
/// payload that caused it.
pub fn run(config: PipelineConfig) -> Result<EmbedReport, EmbedError> {
    let start = Instant::now();

    let output_dir = config.resolved_output_dir();
    fs::create_dir_all(&output_dir)?;

    let ctx = ToolchainContext::for_run(
        config.profile.clone(),
        config.input_dir.clone(),
        output_dir,
        config.toolchain_dir.as_deref(),
        config.translation,
    );
    let emitter = emitter_for(config.strategy);
    preflight(&ctx, emitter.as_ref())?;

    let mut warnings = Vec::new();

    // Discovering
    if config.cancel.is_cancelled() {
        return Err(EmbedError::Aborted {
            phase: PipelinePhase::Discovering,
        });
    }
    let resources = discover(&config.input_dir)?;
    if resources.is_empty() {
        warnings.push(format!(
            "no payload files (.bin, .dat) found in {}",
            config.input_dir.display()
        ));
    }
    if config.verbose {
        for resource in &resources {
            println!(
                "payload {} ({} bytes)",
                resource.file_name(),
                resource.size_bytes
            );
        }
    }

    // Emitting
    let mut objects = Vec::new();
    let mut failures = Vec::new();
    for resource in &resources {
        if config.cancel.is_cancelled() {
            return Err(EmbedError::Aborted {
                phase: PipelinePhase::Emitting,
            });
        }
        match emitter.emit(resource, &ctx) {
            Ok(object) => objects.push(object),
            Err(error) => match config.mode {
                RunMode::FailFast => {
                    return Err(EmbedError::EmitFailed {
                        source_file: resource.file_name(),
                        source: Box::new(error),
                    });
                }
                RunMode::BestEffort => failures.push(EmbedFailure {
                    source_file: resource.file_name(),
                    error,
                }),
            },
        }
    }

    // Assembling — runs only after every emission completed, and only if
    // none failed (an archive missing members is worse than no archive).
    let archive = if failures.is_empty() {
        if config.cancel.is_cancelled() {
            return Err(EmbedError::Aborted {
                phase: PipelinePhase::Assembling,
            });
        }
        Some(assemble(&objects, &ctx, &config.lib_name)?)
    } else {
        warnings.push(format!(
            "{} of {} payloads failed to embed; archive step skipped",
            failures.len(),
            resources.len()
        ));
        None
    };

    Ok(EmbedReport {
        platform: config.profile.id.name().to_string(),
        strategy: config.strategy,
        objects,
        failures,
        warnings,
        archive,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
