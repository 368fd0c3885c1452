//! Error types for platform resolution and symbol naming.

/// Errors that can occur while resolving platforms or deriving symbols.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The platform identifier is not one of the supported set.
    #[error("unsupported platform '{name}' (expected posix-elf, macos, or windows)")]
    UnsupportedPlatform {
        /// The identifier that failed to resolve.
        name: String,
    },

    /// A file name cannot be turned into a valid assembler/linker symbol.
    #[error("'{name}' cannot form a linker symbol: invalid character {offending:?}")]
    InvalidSymbolName {
        /// The offending logical name or extension.
        name: String,
        /// The first character outside `[A-Za-z0-9_]`.
        offending: char,
    },
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, PlatformError>;
