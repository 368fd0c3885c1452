//! `blobforge.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The top-level manifest structure for a blobforge project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobforgeManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Embedding defaults; CLI flags override these.
    #[serde(default)]
    pub embed: Option<EmbedConfig>,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required).
    pub name: String,
    /// Project version.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Embedding defaults section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EmbedConfig {
    /// Payload directory, relative to the manifest directory.
    #[serde(default)]
    pub input: Option<String>,
    /// Output directory, relative to the manifest directory.
    #[serde(default)]
    pub output: Option<String>,
    /// Target platform identifier (posix-elf, macos, windows).
    #[serde(default)]
    pub platform: Option<String>,
    /// Emission strategy (direct, stub).
    #[serde(default)]
    pub strategy: Option<String>,
    /// Logical library name the archive pattern is applied to.
    #[serde(default)]
    pub lib_name: Option<String>,
    /// Toolchain directory prepended to executable search.
    #[serde(default)]
    pub toolchain: Option<String>,
    /// Continue past per-file failures instead of aborting.
    #[serde(default)]
    pub best_effort: Option<bool>,
    /// Translate native paths to the WSL mount convention.
    #[serde(default)]
    pub wsl_paths: Option<bool>,
}

impl BlobforgeManifest {
    /// Search upward from `start_dir` for a `blobforge.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join("blobforge.toml");
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: BlobforgeManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing blobforge.toml")
    }

    /// The embed section, or an all-defaults one.
    pub fn embed(&self) -> EmbedConfig {
        self.embed.clone().unwrap_or_default()
    }

    /// Generate the default template for `blobforge init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
version = "0.1.0"

[embed]
input = "payloads"
strategy = "stub"
lib-name = "v8_data"
"#
        )
    }
}
