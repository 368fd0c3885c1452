//! Run report aggregating all pipeline stages.

use std::fmt;

use crate::archive::ArchiveResult;
use crate::emit::{EmitStrategy, EmittedObject};
use crate::pipeline::EmbedFailure;

/// Summary of one embedding pipeline run.
#[derive(Debug)]
pub struct EmbedReport {
    /// Platform identifier the run targeted.
    pub platform: String,
    /// Emission strategy used.
    pub strategy: EmitStrategy,
    /// Objects emitted, in archive member order.
    pub objects: Vec<EmittedObject>,
    /// Per-file failures collected in best-effort mode.
    pub failures: Vec<EmbedFailure>,
    /// Non-fatal warnings (empty discovery, skipped archive, ...).
    pub warnings: Vec<String>,
    /// The produced archive, absent when the archive step was skipped.
    pub archive: Option<ArchiveResult>,
    /// Total run duration in milliseconds.
    pub duration_ms: u64,
}

impl EmbedReport {
    /// Whether the run completed with every payload embedded and archived.
    pub fn success(&self) -> bool {
        self.failures.is_empty() && self.archive.is_some()
    }
}

impl fmt::Display for EmbedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Embedding Report ===")?;
        writeln!(f, "Platform: {}", self.platform)?;
        writeln!(f, "Strategy: {}", self.strategy.name())?;
        writeln!(f, "Duration: {} ms", self.duration_ms)?;

        writeln!(f)?;
        writeln!(f, "--- Objects ({}) ---", self.objects.len())?;
        for object in &self.objects {
            match &object.symbols {
                Some(symbols) => writeln!(
                    f,
                    "  {} <- {} ({})",
                    object.object_path.display(),
                    object.source_file_name,
                    symbols.start,
                )?,
                None => writeln!(
                    f,
                    "  {} <- {} (converter-default symbols)",
                    object.object_path.display(),
                    object.source_file_name,
                )?,
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Warnings ---")?;
            for warning in &self.warnings {
                writeln!(f, "  {warning}")?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Failures ({}) ---", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.source_file, failure.error)?;
            }
        }

        writeln!(f)?;
        match &self.archive {
            Some(archive) => writeln!(
                f,
                "Archive: {} ({} members)",
                archive.archive_path.display(),
                archive.member_count,
            ),
            None => writeln!(f, "Archive: skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use blobforge_platform::SymbolSet;

    #[test]
    fn report_display_lists_objects_and_archive() {
        let report = EmbedReport {
            platform: "posix-elf".into(),
            strategy: EmitStrategy::Stub,
            objects: vec![EmittedObject {
                object_path: PathBuf::from("obj/snapshot.o"),
                source_file_name: "snapshot.bin".into(),
                symbols: Some(SymbolSet::from_prefix("binary_snapshot_bin")),
            }],
            failures: Vec::new(),
            warnings: Vec::new(),
            archive: Some(ArchiveResult {
                archive_path: PathBuf::from("obj/libv8_data.a"),
                member_count: 1,
            }),
            duration_ms: 12,
        };

        assert!(report.success());
        let output = report.to_string();
        assert!(output.contains("Embedding Report"));
        assert!(output.contains("posix-elf"));
        assert!(output.contains("snapshot.o"));
        assert!(output.contains("binary_snapshot_bin_start"));
        assert!(output.contains("libv8_data.a (1 members)"));
    }

    #[test]
    fn report_display_shows_skipped_archive_and_warnings() {
        let report = EmbedReport {
            platform: "windows".into(),
            strategy: EmitStrategy::Direct,
            objects: Vec::new(),
            failures: Vec::new(),
            warnings: vec!["no payload files (.bin, .dat) found in out".into()],
            archive: None,
            duration_ms: 1,
        };

        assert!(!report.success());
        let output = report.to_string();
        assert!(output.contains("Archive: skipped"));
        assert!(output.contains("no payload files"));
    }
}
