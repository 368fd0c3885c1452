//! Blobforge CLI — embed binary payloads into linker-consumable archives.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use commands::embed::EmbedArgs;
use manifest::BlobforgeManifest;

#[derive(Parser)]
#[command(name = "blobforge", version, about = "Embed binary payloads into static archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new blobforge project
    Init {
        /// Project name
        name: String,
    },
    /// Embed payload files and assemble the archive
    Embed {
        /// Directory containing .bin/.dat payload files
        #[arg(long)]
        input: Option<String>,
        /// Output directory (default: obj/ under the input directory)
        #[arg(long)]
        output: Option<String>,
        /// Target platform (posix-elf, macos, windows; default: host)
        #[arg(long)]
        platform: Option<String>,
        /// Emission strategy (direct, stub; default: stub)
        #[arg(long)]
        strategy: Option<String>,
        /// Logical library name (default: v8_data)
        #[arg(long)]
        lib_name: Option<String>,
        /// Directory prepended to executable search for this run
        #[arg(long)]
        toolchain: Option<String>,
        /// Attempt every payload instead of aborting on the first failure
        #[arg(long)]
        best_effort: bool,
        /// Translate native paths to the WSL mount convention
        #[arg(long)]
        wsl_paths: bool,
        /// Print per-file progress detail
        #[arg(short, long)]
        verbose: bool,
    },
    /// List supported platform profiles
    Platforms,
    /// Check toolchain and project status
    Doctor,
    /// Remove the output directory
    Clean {
        /// Directory containing the payload files
        #[arg(long)]
        input: Option<String>,
        /// Output directory to remove
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Embed {
            input,
            output,
            platform,
            strategy,
            lib_name,
            toolchain,
            best_effort,
            wsl_paths,
            verbose,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            let args = EmbedArgs {
                input: input.as_deref(),
                output: output.as_deref(),
                platform: platform.as_deref(),
                strategy: strategy.as_deref(),
                lib_name: lib_name.as_deref(),
                toolchain: toolchain.as_deref(),
                best_effort,
                wsl_paths,
                verbose,
            };
            commands::embed::run(&project_dir, manifest.as_ref(), &args)
        }

        Commands::Platforms => commands::platforms::list(),

        Commands::Doctor => {
            let (_, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::doctor::run(&project_dir)
        }

        Commands::Clean { input, output } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::clean::run(
                &project_dir,
                manifest.as_ref(),
                input.as_deref(),
                output.as_deref(),
            )
        }
    }
}

/// Try to load a manifest from the current directory upward.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<BlobforgeManifest>, Option<PathBuf>)> {
    match BlobforgeManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
