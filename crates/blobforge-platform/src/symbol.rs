//! Exported symbol naming.
//!
//! Each embedded payload exports three symbols bracketing its bytes:
//! `<prefix>_start`, `<prefix>_end`, and `<prefix>_size`, where the prefix
//! is derived from the file name. Mach-O targets prepend an underscore.

use crate::error::PlatformError;
use crate::profile::PlatformProfile;

/// The three symbols exported by one embedded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    /// Address of the first embedded byte.
    pub start: String,
    /// Address one past the last embedded byte.
    pub end: String,
    /// 32-bit word holding the payload size in bytes.
    pub size: String,
}

impl SymbolSet {
    /// Build the symbol set from a derived prefix.
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            start: format!("{prefix}_start"),
            end: format!("{prefix}_end"),
            size: format!("{prefix}_size"),
        }
    }
}

/// Derive the exported symbol prefix for a payload file.
///
/// Builds `binary_<logical_name>_<extension>` and prepends `_` iff the
/// profile requires the leading underscore. The logical name and extension
/// must already be symbol-safe; anything outside `[A-Za-z0-9_]` is rejected
/// rather than silently emitting a broken symbol.
pub fn symbol_prefix(
    logical_name: &str,
    extension: &str,
    profile: &PlatformProfile,
) -> Result<String, PlatformError> {
    check_symbol_chars(logical_name)?;
    check_symbol_chars(extension)?;

    let mut prefix = format!("binary_{logical_name}_{extension}");
    if profile.symbol_leading_underscore {
        prefix.insert(0, '_');
    }
    Ok(prefix)
}

fn check_symbol_chars(part: &str) -> Result<(), PlatformError> {
    match part.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        None => Ok(()),
        Some(offending) => Err(PlatformError::InvalidSymbolName {
            name: part.to_string(),
            offending,
        }),
    }
}
