//! `blobforge platforms` — supported platform listing.

use anyhow::Result;
use blobforge_platform::{PlatformId, PlatformProfile};

/// List the supported platform profiles.
pub fn list() -> Result<()> {
    println!("Supported platforms:");
    println!();
    println!(
        "  {:<11} {:<15} {:<8} {:<8} {:<14} {}",
        "platform", "object format", "asm", "suffix", "archive", "archiver"
    );
    for id in [PlatformId::PosixElf, PlatformId::MacOs, PlatformId::Windows] {
        let p = PlatformProfile::of(id);
        println!(
            "  {:<11} {:<15} {:<8} {:<8} {:<14} {}",
            p.id.name(),
            p.object_format,
            p.asm_format,
            p.object_suffix,
            p.archive_file_name("<name>"),
            p.archiver,
        );
    }
    println!();
    println!("Mach-O symbols carry a leading underscore; the others do not.");
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn list_runs_without_error() {
        super::list().unwrap();
    }
}
