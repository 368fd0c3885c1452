//! `blobforge embed` — run the embedding pipeline.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use blobforge_embed::{pipeline, EmitStrategy, PathTranslation, PipelineConfig, RunMode};
use blobforge_platform::{PlatformId, PlatformProfile};

use crate::manifest::BlobforgeManifest;

/// CLI flags for the embed command; `None` falls back to manifest values.
#[derive(Debug, Default)]
pub struct EmbedArgs<'a> {
    pub input: Option<&'a str>,
    pub output: Option<&'a str>,
    pub platform: Option<&'a str>,
    pub strategy: Option<&'a str>,
    pub lib_name: Option<&'a str>,
    pub toolchain: Option<&'a str>,
    pub best_effort: bool,
    pub wsl_paths: bool,
    pub verbose: bool,
}

/// Run the pipeline with flags merged over manifest defaults.
pub fn run(
    project_dir: &Path,
    manifest: Option<&BlobforgeManifest>,
    args: &EmbedArgs<'_>,
) -> Result<()> {
    let config = build_config(project_dir, manifest, args)?;

    println!("blobforge embed");
    println!("  Input:    {}", config.input_dir.display());
    println!("  Platform: {}", config.profile.id);
    println!("  Strategy: {}", config.strategy.name());

    let report = pipeline::run(config)?;
    print!("{report}");

    if !report.success() {
        bail!(
            "{} of {} payloads failed to embed",
            report.failures.len(),
            report.objects.len() + report.failures.len()
        );
    }
    Ok(())
}

/// Resolve the effective pipeline configuration.
///
/// Precedence per option: CLI flag, then manifest `[embed]` value, then the
/// built-in default. Manifest paths are relative to the manifest directory.
pub(crate) fn build_config(
    project_dir: &Path,
    manifest: Option<&BlobforgeManifest>,
    args: &EmbedArgs<'_>,
) -> Result<PipelineConfig> {
    let defaults = manifest.map(|m| m.embed()).unwrap_or_default();

    let input_dir = match (args.input, defaults.input.as_deref()) {
        (Some(flag), _) => PathBuf::from(flag),
        (None, Some(section)) => project_dir.join(section),
        (None, None) => bail!(
            "no input directory: pass --input <DIR> or set [embed] input in blobforge.toml"
        ),
    };
    if !input_dir.is_dir() {
        bail!("input directory {} does not exist", input_dir.display());
    }

    let platform_name = args
        .platform
        .map(str::to_string)
        .or(defaults.platform)
        .unwrap_or_else(|| PlatformId::host().name().to_string());
    let profile = PlatformProfile::resolve(&platform_name)
        .with_context(|| format!("resolving platform '{platform_name}'"))?;

    let strategy = match args.strategy.map(str::to_string).or(defaults.strategy) {
        Some(name) => name
            .parse::<EmitStrategy>()
            .with_context(|| format!("resolving strategy '{name}'"))?,
        None => EmitStrategy::default(),
    };

    let mut config = PipelineConfig::new(profile, input_dir);
    config.strategy = strategy;
    config.output_dir = match (args.output, defaults.output.as_deref()) {
        (Some(flag), _) => Some(PathBuf::from(flag)),
        (None, Some(section)) => Some(project_dir.join(section)),
        (None, None) => None,
    };
    if let Some(name) = args.lib_name.map(str::to_string).or(defaults.lib_name) {
        config.lib_name = name;
    }
    config.toolchain_dir = match (args.toolchain, defaults.toolchain.as_deref()) {
        (Some(flag), _) => Some(PathBuf::from(flag)),
        (None, Some(section)) => Some(PathBuf::from(section)),
        (None, None) => None,
    };
    if args.best_effort || defaults.best_effort.unwrap_or(false) {
        config.mode = RunMode::BestEffort;
    }
    if args.wsl_paths || defaults.wsl_paths.unwrap_or(false) {
        config.translation = PathTranslation::WslMount;
    }
    config.verbose = args.verbose;

    Ok(config)
}
