//! Binary-resource embedding pipeline for blobforge.
//!
//! Turns a directory of opaque binary payload files into linker-consumable
//! object files and bundles them into one static archive, through a
//! four-stage pipeline: discover -> emit (per file) -> assemble -> report.
//! Platform divergence (object formats, naming, archiver choice) lives in
//! `blobforge-platform`; this crate drives the external toolchain.

pub mod archive;
pub mod discover;
pub mod emit;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod toolchain;

pub use archive::{assemble, ArchiveResult};
pub use discover::{discover, BinaryResource, PAYLOAD_EXTENSIONS};
pub use emit::{
    emitter_for, DirectEmitter, EmitStrategy, EmittedObject, ObjectEmitter, StubEmitter,
    UnknownStrategy,
};
pub use error::EmbedError;
pub use pipeline::{
    run, CancelToken, EmbedFailure, PipelineConfig, PipelinePhase, RunMode,
};
pub use report::EmbedReport;
pub use toolchain::{PathTranslation, ToolchainContext};
