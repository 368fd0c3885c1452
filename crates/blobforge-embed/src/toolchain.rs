//! Toolchain and path resolution.
//!
//! Locates external executables and, when the toolchain lives on the other
//! side of a host/guest filesystem split (WSL-style), translates native
//! paths into the guest's mount-point convention. All configuration is
//! per-run; the process environment is never mutated.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use blobforge_platform::PlatformProfile;

use crate::error::EmbedError;

/// How native paths are rendered before being handed to external commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathTranslation {
    /// Pass paths through unchanged.
    #[default]
    Native,
    /// Map an absolute native path onto the WSL `/mnt/<drive>/...` mount.
    WslMount,
}

impl PathTranslation {
    /// Render `path` for the guest side of the toolchain.
    pub fn apply(self, path: &Path) -> String {
        match self {
            Self::Native => path.display().to_string(),
            Self::WslMount => wsl_guest_path(path),
        }
    }
}

/// Translate an absolute native path to the WSL mount convention.
///
/// `C:\v8\out` becomes `/mnt/c/v8/out`; a rooted POSIX-style path is
/// mounted under drive `c` (`/v8/out` -> `/mnt/c/v8/out`).
fn wsl_guest_path(path: &Path) -> String {
    let flat = path.display().to_string().replace('\\', "/");

    let (drive, rest) = match flat.split_once(':') {
        Some((d, rest)) if d.len() == 1 && d.chars().all(|c| c.is_ascii_alphabetic()) => {
            (d.to_ascii_lowercase(), rest.trim_start_matches('/').to_string())
        }
        _ => ("c".to_string(), flat.trim_start_matches('/').to_string()),
    };

    if rest.is_empty() {
        format!("/mnt/{drive}")
    } else {
        format!("/mnt/{drive}/{rest}")
    }
}

/// Search a list of directories for an executable file named `name`.
pub fn search_for(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        // Windows toolchain binaries may only exist with the .exe suffix.
        let with_exe = dir.join(format!("{name}.exe"));
        if with_exe.is_file() {
            return Some(with_exe);
        }
    }
    None
}

/// Per-run toolchain configuration. Constructed once at pipeline start,
/// read-only thereafter.
#[derive(Debug, Clone)]
pub struct ToolchainContext {
    /// Active platform profile for this run.
    pub profile: PlatformProfile,
    /// Directory containing the payload files; external commands run here.
    pub work_dir: PathBuf,
    /// Directory receiving objects, stubs, and the archive.
    pub output_dir: PathBuf,
    /// Executable search directories, highest priority first.
    pub search_path: Vec<PathBuf>,
    /// Path rendering for command arguments.
    pub translation: PathTranslation,
}

impl ToolchainContext {
    /// Build the context for one pipeline run.
    ///
    /// `toolchain_dir`, when given, is prepended to the executable search
    /// order for this run only; the caller's `PATH` is read but never
    /// modified.
    pub fn for_run(
        profile: PlatformProfile,
        work_dir: PathBuf,
        output_dir: PathBuf,
        toolchain_dir: Option<&Path>,
        translation: PathTranslation,
    ) -> Self {
        let mut search_path = Vec::new();
        if let Some(dir) = toolchain_dir {
            search_path.push(dir.to_path_buf());
        }
        if let Some(path_var) = env::var_os("PATH") {
            search_path.extend(env::split_paths(&path_var));
        }

        Self {
            profile,
            work_dir,
            output_dir,
            search_path,
            translation,
        }
    }

    /// Locate an executable, or fail with [`EmbedError::ToolNotFound`].
    pub fn find_tool(&self, name: &str) -> Result<PathBuf, EmbedError> {
        search_for(name, &self.search_path).ok_or_else(|| EmbedError::ToolNotFound {
            tool: name.to_string(),
        })
    }

    /// Render a path for use as an external command argument.
    pub fn guest_path(&self, path: &Path) -> String {
        self.translation.apply(path)
    }
}

/// Run an external tool synchronously, logging the command line first.
///
/// Stdout/stderr are captured; a non-zero exit becomes
/// [`EmbedError::ToolInvocation`] carrying the exact command, working
/// directory, and exit status so the failure can be reproduced by hand.
pub fn run_tool(program: &Path, args: &[String], cwd: &Path) -> Result<(), EmbedError> {
    let command_line = render_command(program, args);
    println!("{command_line}");

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EmbedError::ToolNotFound {
                tool: program.display().to_string(),
            },
            _ => EmbedError::Io(e),
        })?;

    if !output.status.success() {
        return Err(EmbedError::ToolInvocation {
            command: command_line,
            cwd: cwd.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        });
    }

    Ok(())
}

/// Render a program + argument list as one reproducible command line.
pub fn render_command(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_translation_is_identity() {
        let p = Path::new("/v8/out/obj/snapshot.o");
        assert_eq!(PathTranslation::Native.apply(p), "/v8/out/obj/snapshot.o");
    }

    #[test]
    fn wsl_translation_maps_drive_letters() {
        let t = PathTranslation::WslMount;
        assert_eq!(t.apply(Path::new("C:\\v8\\out\\obj")), "/mnt/c/v8/out/obj");
        assert_eq!(t.apply(Path::new("D:/data/icudtl.dat")), "/mnt/d/data/icudtl.dat");
    }

    #[test]
    fn wsl_translation_defaults_to_drive_c() {
        let t = PathTranslation::WslMount;
        assert_eq!(t.apply(Path::new("/v8/out")), "/mnt/c/v8/out");
    }

    #[test]
    fn search_finds_tool_in_first_matching_dir() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        std::fs::write(dir_b.path().join("nasm"), b"").unwrap();

        let dirs = vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()];
        let found = search_for("nasm", &dirs).unwrap();
        assert_eq!(found, dir_b.path().join("nasm"));
    }

    #[test]
    fn search_prefers_earlier_directories() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        std::fs::write(dir_a.path().join("ar"), b"").unwrap();
        std::fs::write(dir_b.path().join("ar"), b"").unwrap();

        let dirs = vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()];
        assert_eq!(search_for("ar", &dirs).unwrap(), dir_a.path().join("ar"));
    }

    #[test]
    fn search_accepts_exe_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("objcopy.exe"), b"").unwrap();

        let dirs = vec![dir.path().to_path_buf()];
        assert_eq!(
            search_for("objcopy", &dirs).unwrap(),
            dir.path().join("objcopy.exe")
        );
    }

    #[test]
    fn find_tool_reports_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ToolchainContext {
            profile: PlatformProfile::posix_elf(),
            work_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("obj"),
            search_path: vec![dir.path().to_path_buf()],
            translation: PathTranslation::Native,
        };

        let err = ctx.find_tool("definitely-not-a-tool").unwrap_err();
        assert!(matches!(
            err,
            EmbedError::ToolNotFound { ref tool } if tool == "definitely-not-a-tool"
        ));
    }

    #[test]
    fn render_command_joins_program_and_args() {
        let line = render_command(
            Path::new("nasm"),
            &["-f".into(), "elf64".into(), "-o".into(), "obj/x.o".into()],
        );
        assert_eq!(line, "nasm -f elf64 -o obj/x.o");
    }
}
