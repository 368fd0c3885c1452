//! Static archive assembly.
//!
//! Fan-in stage of the pipeline: collects all emitted objects into one
//! static library using the platform archiver in replace-verbose-create
//! mode. Member order is the insertion order of the input sequence, which
//! the pipeline keeps equal to sorted discovery order, making archives
//! byte-reproducible across runs on unchanged inputs.

use std::path::PathBuf;

use crate::emit::EmittedObject;
use crate::error::EmbedError;
use crate::toolchain::{run_tool, ToolchainContext};

/// Terminal artifact of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResult {
    /// Path of the produced archive.
    pub archive_path: PathBuf,
    /// Number of object members inserted.
    pub member_count: usize,
}

/// Combine `objects` into one static archive named after `lib_name`.
///
/// The archiver runs inside the output directory and is given bare member
/// file names, so no path translation is needed for members. An empty
/// `objects` sequence is not an error; it produces an archive with zero
/// members.
pub fn assemble(
    objects: &[EmittedObject],
    ctx: &ToolchainContext,
    lib_name: &str,
) -> Result<ArchiveResult, EmbedError> {
    let archive_name = ctx.profile.archive_file_name(lib_name);
    let archiver = ctx.find_tool(ctx.profile.archiver)?;

    let mut args = vec!["rvs".to_string(), archive_name.clone()];
    for object in objects {
        let member = object
            .object_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| object.object_path.display().to_string());
        args.push(member);
    }
    run_tool(&archiver, &args, &ctx.output_dir)?;

    Ok(ArchiveResult {
        archive_path: ctx.output_dir.join(archive_name),
        member_count: objects.len(),
    })
}
