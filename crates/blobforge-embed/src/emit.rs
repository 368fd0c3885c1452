//! Object emission.
//!
//! Two interchangeable strategies implement the same [`ObjectEmitter`]
//! contract: direct binary-to-object conversion via `objcopy`, and
//! assembler-stub generation via `nasm`. The stub strategy fully controls
//! the exported symbol names and is the default; the direct strategy
//! accepts the converter's own naming and exists for hosts without an
//! assembler. Adding a third strategy must not touch the assembler side.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use blobforge_platform::{symbol_prefix, SymbolSet};

use crate::discover::BinaryResource;
use crate::error::EmbedError;
use crate::toolchain::{run_tool, ToolchainContext};

/// Which emission algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitStrategy {
    /// `objcopy -I binary`: reinterpret the payload as a flat binary blob.
    Direct,
    /// Generate a minimal assembly stub and assemble it with `nasm`.
    #[default]
    Stub,
}

impl EmitStrategy {
    /// The canonical name used on the CLI and in manifests.
    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Stub => "stub",
        }
    }
}

/// Error returned when a strategy name does not parse.
#[derive(Debug, thiserror::Error)]
#[error("unknown strategy '{0}' (expected direct or stub)")]
pub struct UnknownStrategy(String);

impl FromStr for EmitStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "stub" => Ok(Self::Stub),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// One object file produced from one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedObject {
    /// Path of the emitted object file.
    pub object_path: PathBuf,
    /// File name of the payload this object embeds.
    pub source_file_name: String,
    /// Exported symbols, when the strategy controls them. `None` under the
    /// direct strategy, which accepts the converter's default naming.
    pub symbols: Option<SymbolSet>,
}

/// Contract shared by all emission strategies.
pub trait ObjectEmitter {
    /// External executables this strategy needs, resolved before any file
    /// is processed.
    fn required_tools(&self) -> &'static [&'static str];

    /// Convert one payload into one object file in the output directory.
    fn emit(
        &self,
        resource: &BinaryResource,
        ctx: &ToolchainContext,
    ) -> Result<EmittedObject, EmbedError>;
}

/// Construct the emitter for a strategy.
pub fn emitter_for(strategy: EmitStrategy) -> Box<dyn ObjectEmitter> {
    match strategy {
        EmitStrategy::Direct => Box::new(DirectEmitter),
        EmitStrategy::Stub => Box::new(StubEmitter),
    }
}

/// Direct binary-to-object reinterpretation through `objcopy`.
pub struct DirectEmitter;

impl ObjectEmitter for DirectEmitter {
    fn required_tools(&self) -> &'static [&'static str] {
        &["objcopy"]
    }

    fn emit(
        &self,
        resource: &BinaryResource,
        ctx: &ToolchainContext,
    ) -> Result<EmittedObject, EmbedError> {
        let object_path = ctx
            .output_dir
            .join(ctx.profile.object_file_name(&resource.logical_name));
        let objcopy = ctx.find_tool("objcopy")?;

        // The input architecture tag is a fixed 32-bit placeholder; the
        // converter only needs it to produce a well-formed header.
        let args = vec![
            "-I".to_string(),
            "binary".to_string(),
            "-O".to_string(),
            ctx.profile.object_format.to_string(),
            "-B".to_string(),
            "i386".to_string(),
            resource.file_name(),
            ctx.guest_path(&object_path),
        ];
        run_tool(&objcopy, &args, &ctx.work_dir)?;

        Ok(EmittedObject {
            object_path,
            source_file_name: resource.file_name(),
            symbols: None,
        })
    }
}

/// Assembly-stub generation, assembled with `nasm`.
pub struct StubEmitter;

impl StubEmitter {
    /// Render the stub source embedding `payload_name` under `prefix`.
    fn stub_source(prefix: &str, payload_name: &str) -> String {
        format!(
            "section .rodata\n\
             \n\
             global {prefix}_start\n\
             global {prefix}_end\n\
             global {prefix}_size\n\
             \n\
             {prefix}_start: incbin \"{payload_name}\"\n\
             {prefix}_end:\n\
             {prefix}_size:  dd {prefix}_end - {prefix}_start\n"
        )
    }
}

impl ObjectEmitter for StubEmitter {
    fn required_tools(&self) -> &'static [&'static str] {
        &["nasm"]
    }

    fn emit(
        &self,
        resource: &BinaryResource,
        ctx: &ToolchainContext,
    ) -> Result<EmittedObject, EmbedError> {
        let prefix = symbol_prefix(&resource.logical_name, &resource.extension, &ctx.profile)?;
        let symbols = SymbolSet::from_prefix(&prefix);

        let stub_path = ctx
            .output_dir
            .join(format!("{}.s", resource.logical_name));
        fs::write(&stub_path, Self::stub_source(&prefix, &resource.file_name()))?;

        let object_path = ctx
            .output_dir
            .join(ctx.profile.object_file_name(&resource.logical_name));
        let nasm = ctx.find_tool("nasm")?;

        // Assembled from the payload directory so incbin resolves the bare
        // payload name.
        let args = vec![
            "-f".to_string(),
            ctx.profile.asm_format.to_string(),
            "-o".to_string(),
            ctx.guest_path(&object_path),
            ctx.guest_path(&stub_path),
        ];
        run_tool(&nasm, &args, &ctx.work_dir)?;

        Ok(EmittedObject {
            object_path,
            source_file_name: resource.file_name(),
            symbols: Some(symbols),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blobforge_platform::PlatformProfile;
    use crate::toolchain::PathTranslation;

    #[test]
    fn strategy_parsing_round_trips() {
        assert_eq!("direct".parse::<EmitStrategy>().unwrap(), EmitStrategy::Direct);
        assert_eq!("stub".parse::<EmitStrategy>().unwrap(), EmitStrategy::Stub);
        assert!("fancy".parse::<EmitStrategy>().is_err());
        assert_eq!(EmitStrategy::Stub.name(), "stub");
    }

    #[test]
    fn stub_source_embeds_and_brackets_the_payload() {
        let src = StubEmitter::stub_source("binary_snapshot_bin", "snapshot.bin");
        assert!(src.contains("section .rodata"));
        assert!(src.contains("global binary_snapshot_bin_start"));
        assert!(src.contains("global binary_snapshot_bin_end"));
        assert!(src.contains("global binary_snapshot_bin_size"));
        assert!(src.contains("binary_snapshot_bin_start: incbin \"snapshot.bin\""));
        assert!(src.contains(
            "binary_snapshot_bin_size:  dd binary_snapshot_bin_end - binary_snapshot_bin_start"
        ));
    }

    #[test]
    fn required_tools_per_strategy() {
        assert_eq!(DirectEmitter.required_tools(), ["objcopy"]);
        assert_eq!(StubEmitter.required_tools(), ["nasm"]);
    }

    #[cfg(unix)]
    mod with_fake_tools {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        /// Install a fake tool script into `dir` that writes a marker into
        /// the path following `-o` (nasm-style) or its last argument
        /// (objcopy-style).
        fn install_fake_tool(dir: &Path, name: &str, script: &str) {
            let path = dir.join(name);
            fs::write(&path, script).unwrap();
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).unwrap();
        }

        const FAKE_NASM: &str =
            "#!/bin/sh\nwhile [ \"$1\" != \"-o\" ]; do shift; done\nshift\necho fake-object > \"$1\"\n";
        const FAKE_OBJCOPY: &str =
            "#!/bin/sh\nfor last; do :; done\necho fake-object > \"$last\"\n";
        const FAKE_FAILING: &str = "#!/bin/sh\necho conversion exploded >&2\nexit 1\n";

        fn context(work: &Path, tools: &Path, profile: PlatformProfile) -> ToolchainContext {
            let output_dir = work.join("obj");
            fs::create_dir_all(&output_dir).unwrap();
            ToolchainContext {
                profile,
                work_dir: work.to_path_buf(),
                output_dir,
                search_path: vec![tools.to_path_buf()],
                translation: PathTranslation::Native,
            }
        }

        fn resource(work: &Path, name: &str, contents: &[u8]) -> BinaryResource {
            fs::write(work.join(name), contents).unwrap();
            let (stem, ext) = name.split_once('.').unwrap();
            BinaryResource {
                source_path: work.join(name),
                logical_name: stem.to_string(),
                extension: ext.to_string(),
                size_bytes: contents.len() as u64,
            }
        }

        #[test]
        fn stub_emitter_writes_stub_and_object() {
            let work = tempfile::tempdir().unwrap();
            let tools = tempfile::tempdir().unwrap();
            install_fake_tool(tools.path(), "nasm", FAKE_NASM);

            let ctx = context(work.path(), tools.path(), PlatformProfile::posix_elf());
            let res = resource(work.path(), "snapshot.bin", &[7u8; 32]);

            let emitted = StubEmitter.emit(&res, &ctx).unwrap();
            assert_eq!(emitted.object_path, ctx.output_dir.join("snapshot.o"));
            assert!(emitted.object_path.is_file());
            assert!(ctx.output_dir.join("snapshot.s").is_file());

            let symbols = emitted.symbols.unwrap();
            assert_eq!(symbols.start, "binary_snapshot_bin_start");
            assert_eq!(symbols.size, "binary_snapshot_bin_size");
        }

        #[test]
        fn stub_emitter_applies_macos_underscore() {
            let work = tempfile::tempdir().unwrap();
            let tools = tempfile::tempdir().unwrap();
            install_fake_tool(tools.path(), "nasm", FAKE_NASM);

            let ctx = context(work.path(), tools.path(), PlatformProfile::macos());
            let res = resource(work.path(), "snapshot.bin", &[7u8; 32]);

            let emitted = StubEmitter.emit(&res, &ctx).unwrap();
            let symbols = emitted.symbols.unwrap();
            assert_eq!(symbols.start, "_binary_snapshot_bin_start");

            let stub = fs::read_to_string(ctx.output_dir.join("snapshot.s")).unwrap();
            assert!(stub.contains("global _binary_snapshot_bin_start"));
        }

        #[test]
        fn direct_emitter_invokes_converter() {
            let work = tempfile::tempdir().unwrap();
            let tools = tempfile::tempdir().unwrap();
            install_fake_tool(tools.path(), "objcopy", FAKE_OBJCOPY);

            let ctx = context(work.path(), tools.path(), PlatformProfile::posix_elf());
            let res = resource(work.path(), "icudtl.dat", &[1u8; 16]);

            let emitted = DirectEmitter.emit(&res, &ctx).unwrap();
            assert_eq!(emitted.object_path, ctx.output_dir.join("icudtl.o"));
            assert!(emitted.object_path.is_file());
            assert!(emitted.symbols.is_none());
        }

        #[test]
        fn failing_converter_reports_command_and_status() {
            let work = tempfile::tempdir().unwrap();
            let tools = tempfile::tempdir().unwrap();
            install_fake_tool(tools.path(), "objcopy", FAKE_FAILING);

            let ctx = context(work.path(), tools.path(), PlatformProfile::posix_elf());
            let res = resource(work.path(), "icudtl.dat", &[1u8; 16]);

            let err = DirectEmitter.emit(&res, &ctx).unwrap_err();
            match err {
                EmbedError::ToolInvocation {
                    command, stderr, ..
                } => {
                    assert!(command.contains("icudtl.dat"));
                    assert!(stderr.contains("conversion exploded"));
                }
                other => panic!("expected ToolInvocation, got {other:?}"),
            }
        }

        #[test]
        fn stub_emitter_rejects_unsafe_names_before_invoking_tools() {
            let work = tempfile::tempdir().unwrap();
            let tools = tempfile::tempdir().unwrap();
            // No nasm installed: symbol validation must fail first.
            let ctx = context(work.path(), tools.path(), PlatformProfile::posix_elf());
            let res = resource(work.path(), "snap-shot.bin", &[0u8; 4]);

            let err = StubEmitter.emit(&res, &ctx).unwrap_err();
            assert!(matches!(err, EmbedError::Platform(_)));
        }
    }
}
