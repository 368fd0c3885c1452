//! `blobforge doctor` — toolchain diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;

use crate::manifest::BlobforgeManifest;

/// Print toolchain diagnostic information.
pub fn run(project_dir: &Path) -> Result<()> {
    println!("=== Blobforge Doctor ===");
    println!();

    println!("Blobforge version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- System Tools ---");
    print_tool_status("nasm", &["-v"]);
    print_tool_status("objcopy", &["--version"]);
    print_tool_status("ar", &["--version"]);
    print_tool_status("x86_64-w64-mingw32-ar", &["--version"]);
    println!();

    println!("--- Project Status ---");
    match BlobforgeManifest::find_and_load(project_dir) {
        Ok(Some((manifest, dir))) => {
            println!("  blobforge.toml: found at {}", dir.display());
            println!("  Project:        {}", manifest.project.name);
            println!("  Version:        {}", manifest.project.version);
            let embed = manifest.embed();
            if let Some(input) = embed.input {
                println!("  Input dir:      {input}");
            }
            if let Some(platform) = embed.platform {
                println!("  Platform:       {platform}");
            }
        }
        Ok(None) => {
            println!("  blobforge.toml: not found");
        }
        Err(e) => {
            println!("  blobforge.toml: error — {e}");
        }
    }

    Ok(())
}

fn print_tool_status(name: &str, args: &[&str]) {
    match Command::new(name).args(args).output() {
        Ok(output) => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or("(unknown version)");
            println!("  {name}: {first_line}");
        }
        Err(_) => {
            println!("  {name}: not found");
        }
    }
}
