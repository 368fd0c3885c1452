//! Platform profiles and symbol naming conventions for blobforge.
//!
//! A [`PlatformProfile`] bundles everything that differs between the
//! supported targets: object format names, file suffixes, archive naming,
//! the archiver binary, and the symbol underscore convention. The profile
//! is the single source of truth for platform branching; the rest of the
//! pipeline never inspects the platform identifier directly.

pub mod error;
pub mod profile;
pub mod symbol;

pub use error::PlatformError;
pub use profile::{PlatformId, PlatformProfile};
pub use symbol::{symbol_prefix, SymbolSet};
