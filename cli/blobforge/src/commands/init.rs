//! `blobforge init` — project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::BlobforgeManifest;

/// Create a new blobforge project at the given path.
pub fn run(name: &str) -> Result<()> {
    let project_dir = Path::new(name);
    create_project(project_dir, name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir.join("payloads")).context("creating payloads/ directory")?;

    let manifest_content = BlobforgeManifest::template(name);
    fs::write(project_dir.join("blobforge.toml"), &manifest_content)
        .context("writing blobforge.toml")?;

    fs::write(project_dir.join(".gitignore"), "payloads/obj/\n").context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/blobforge.toml");
    println!("  {name}/payloads/");
    println!("  {name}/.gitignore");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_project_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("embed-project");

        create_project(&project_path, "embed-project").unwrap();

        assert!(project_path.join("blobforge.toml").is_file());
        assert!(project_path.join("payloads").is_dir());
        assert!(project_path.join(".gitignore").is_file());
    }

    #[test]
    fn init_generates_valid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("valid-manifest");

        create_project(&project_path, "valid-manifest").unwrap();

        let content = fs::read_to_string(project_path.join("blobforge.toml")).unwrap();
        let manifest = BlobforgeManifest::from_str(&content).unwrap();
        assert_eq!(manifest.project.name, "valid-manifest");
    }

    #[test]
    fn init_refuses_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("existing");
        fs::create_dir(&project_path).unwrap();

        let result = create_project(&project_path, "existing");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }
}
