//! Payload discovery.
//!
//! Scans the input directory for binary payload files. Two extensions are
//! recognized and treated identically; the discovery set is sorted
//! lexicographically by file name so that downstream archive member order
//! is reproducible across runs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EmbedError;

/// Payload file extensions recognized by discovery (without leading dot).
pub const PAYLOAD_EXTENSIONS: &[&str] = &["bin", "dat"];

/// One binary payload found by discovery. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryResource {
    /// Full path to the payload file.
    pub source_path: PathBuf,
    /// File stem, used for object naming and symbol derivation.
    pub logical_name: String,
    /// File extension without the leading dot.
    pub extension: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
}

impl BinaryResource {
    /// The payload's plain file name (`<logical_name>.<extension>`).
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.logical_name, self.extension)
    }
}

/// Discover payload files in `input_dir`, sorted by file name.
///
/// Non-payload entries are ignored. File names that are not valid UTF-8 are
/// carried through lossily; the symbol namer rejects them later if they
/// cannot form a symbol.
pub fn discover(input_dir: &Path) -> Result<Vec<BinaryResource>, EmbedError> {
    let mut resources = Vec::new();

    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(extension) = path.extension().map(|e| e.to_string_lossy().into_owned()) else {
            continue;
        };
        if !PAYLOAD_EXTENSIONS.contains(&extension.as_str()) {
            continue;
        }

        let logical_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size_bytes = entry.metadata()?.len();

        resources.push(BinaryResource {
            source_path: path,
            logical_name,
            extension,
            size_bytes,
        });
    }

    resources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, contents: &[u8]) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn discovers_both_extensions_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "snapshot.bin", &[0u8; 16]);
        touch(dir.path(), "icudtl.dat", &[0u8; 8]);

        let found = discover(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].file_name(), "icudtl.dat");
        assert_eq!(found[1].file_name(), "snapshot.bin");
        assert_eq!(found[0].logical_name, "icudtl");
        assert_eq!(found[0].extension, "dat");
        assert_eq!(found[0].size_bytes, 8);
    }

    #[test]
    fn ignores_other_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "payload.bin", b"x");
        touch(dir.path(), "readme.txt", b"not a payload");
        touch(dir.path(), "noextension", b"nope");
        fs::create_dir(dir.path().join("nested.bin")).unwrap();

        let found = discover(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].logical_name, "payload");
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover(dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn order_is_deterministic_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.bin", "a.dat", "b.bin", "d.dat"] {
            touch(dir.path(), name, b"x");
        }

        let first: Vec<_> = discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|r| r.file_name())
            .collect();
        let second: Vec<_> = discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|r| r.file_name())
            .collect();
        assert_eq!(first, vec!["a.dat", "b.bin", "c.bin", "d.dat"]);
        assert_eq!(first, second);
    }
}
