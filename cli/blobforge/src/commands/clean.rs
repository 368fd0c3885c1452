//! `blobforge clean` — remove build artifacts.

use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::commands::embed::{build_config, EmbedArgs};
use crate::manifest::BlobforgeManifest;

/// Remove the resolved output directory.
pub fn run(
    project_dir: &Path,
    manifest: Option<&BlobforgeManifest>,
    input: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    let args = EmbedArgs {
        input,
        output,
        ..Default::default()
    };
    let config = build_config(project_dir, manifest, &args)?;
    let out_dir = config
        .output_dir
        .unwrap_or_else(|| config.input_dir.join("obj"));

    if out_dir.exists() {
        fs::remove_dir_all(&out_dir)?;
        println!("Removed {}", out_dir.display());
    } else {
        println!("Already clean: {} does not exist", out_dir.display());
    }

    Ok(())
}
