//! Platform profile resolution.
//!
//! Each supported target gets one well-known [`PlatformProfile`] value
//! describing its toolchain conventions. Exactly one profile is active per
//! pipeline run.

use std::fmt;

use crate::error::PlatformError;

/// Identifier for a supported target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    /// ELF-based POSIX systems (Linux and friends).
    PosixElf,
    /// macOS (Mach-O).
    MacOs,
    /// Windows (PE/COFF), driven through a MinGW toolchain.
    Windows,
}

impl PlatformId {
    /// Parse a platform identifier string.
    pub fn parse(name: &str) -> Result<Self, PlatformError> {
        match name {
            "posix-elf" => Ok(Self::PosixElf),
            "macos" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            other => Err(PlatformError::UnsupportedPlatform {
                name: other.to_string(),
            }),
        }
    }

    /// The canonical identifier string.
    pub fn name(self) -> &'static str {
        match self {
            Self::PosixElf => "posix-elf",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        }
    }

    /// The platform this build of blobforge is running on.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::PosixElf
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Toolchain conventions for one target platform.
///
/// Immutable; constructed only through [`PlatformProfile::resolve`] or the
/// per-platform constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    /// The platform this profile describes.
    pub id: PlatformId,
    /// Object format name as understood by the binary-to-object converter.
    pub object_format: &'static str,
    /// Object format name as understood by the assembler backend.
    pub asm_format: &'static str,
    /// File suffix for emitted object files (with leading dot).
    pub object_suffix: &'static str,
    /// Archive file naming pattern; `{}` is replaced by the library name.
    pub archive_name_pattern: &'static str,
    /// Archiver command name.
    pub archiver: &'static str,
    /// Whether exported symbols carry a leading underscore.
    pub symbol_leading_underscore: bool,
}

impl PlatformProfile {
    /// Resolve a platform identifier to its profile.
    ///
    /// Pure and total over the supported identifiers; anything else is
    /// [`PlatformError::UnsupportedPlatform`].
    pub fn resolve(name: &str) -> Result<Self, PlatformError> {
        Ok(Self::of(PlatformId::parse(name)?))
    }

    /// The profile for a known platform identifier.
    pub fn of(id: PlatformId) -> Self {
        match id {
            PlatformId::PosixElf => Self::posix_elf(),
            PlatformId::MacOs => Self::macos(),
            PlatformId::Windows => Self::windows(),
        }
    }

    /// ELF64 profile for POSIX systems.
    pub fn posix_elf() -> Self {
        Self {
            id: PlatformId::PosixElf,
            object_format: "elf64-x86-64",
            asm_format: "elf64",
            object_suffix: ".o",
            archive_name_pattern: "lib{}.a",
            archiver: "ar",
            symbol_leading_underscore: false,
        }
    }

    /// Mach-O profile for macOS.
    pub fn macos() -> Self {
        Self {
            id: PlatformId::MacOs,
            object_format: "mach-o-x86-64",
            asm_format: "macho64",
            object_suffix: ".o",
            archive_name_pattern: "lib{}.a",
            archiver: "ar",
            symbol_leading_underscore: true,
        }
    }

    /// PE/COFF profile for Windows, archived with the MinGW `ar`.
    pub fn windows() -> Self {
        Self {
            id: PlatformId::Windows,
            object_format: "pe-x86-64",
            asm_format: "win64",
            object_suffix: ".obj",
            archive_name_pattern: "{}.lib",
            archiver: "x86_64-w64-mingw32-ar",
            symbol_leading_underscore: false,
        }
    }

    /// File name of an object emitted for the given file stem.
    pub fn object_file_name(&self, stem: &str) -> String {
        format!("{stem}{}", self.object_suffix)
    }

    /// File name of the archive for the given logical library name.
    pub fn archive_file_name(&self, lib_name: &str) -> String {
        self.archive_name_pattern.replace("{}", lib_name)
    }
}
