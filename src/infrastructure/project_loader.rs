use anyhow::{Context, Result};
use cargo_metadata::MetadataCommand;
use std::fs;
use std::path::Path;

/// Collects `(crate_name, file_path, file_content)` triples from files,
/// folders, and Cargo workspaces.
pub struct ProjectLoader {
    exclude_dirs: Vec<String>,
}

impl Default for ProjectLoader {
    fn default() -> Self {
        Self {
            exclude_dirs: vec!["target".to_string(), ".git".to_string()],
        }
    }
}

impl ProjectLoader {
    /// Loader that also skips the configured directory names.
    pub fn with_excludes(extra: &[String]) -> Self {
        let mut loader = Self::default();
        loader
            .exclude_dirs
            .extend(extra.iter().map(|dir| dir.to_string()));
        loader
    }

    /// Load explicit source files. The crate name is the file stem.
    pub fn load_files(&self, paths: &[String]) -> Result<Vec<(String, String, String)>> {
        let mut files = Vec::new();
        for path in paths {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Cannot read input file {}", path))?;
            let crate_name = Path::new(path)
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| "input".to_string());
            files.push((crate_name, path.clone(), content));
        }
        Ok(files)
    }

    /// Load all `.rs` files under a folder. The crate name is the folder name.
    pub fn load_folder(&self, dir: &str) -> Result<Vec<(String, String, String)>> {
        let root = Path::new(dir);
        let crate_name = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "crate".to_string());

        let mut files = Vec::new();
        self.collect_rs_recursive(root, &crate_name, &mut files)?;
        Ok(files)
    }

    /// Load all source files from a Cargo workspace manifest.
    /// Uses `cargo metadata` when available; falls back to reading the
    /// workspace members straight out of the manifest.
    pub fn load_workspace(&self, manifest_path: &str) -> Result<Vec<(String, String, String)>> {
        let mut files = match self.load_workspace_via_metadata(manifest_path) {
            Ok(files) => files,
            Err(e) => {
                eprintln!(
                    "[metricraft] WARN: cargo metadata failed ({}), falling back to manifest scan",
                    e
                );
                self.load_members_from_toml(manifest_path)?
            }
        };

        // Dedup files if multiple targets point to the same sources.
        files.sort_by(|a, b| a.1.cmp(&b.1));
        files.dedup_by(|a, b| a.1 == b.1);

        Ok(files)
    }

    fn load_workspace_via_metadata(
        &self,
        manifest_path: &str,
    ) -> Result<Vec<(String, String, String)>> {
        let metadata = MetadataCommand::new()
            .manifest_path(manifest_path)
            .no_deps()
            .exec()
            .context("Failed to execute cargo metadata")?;

        let mut files = Vec::new();

        for package_id in &metadata.workspace_members {
            if let Some(package) = metadata.packages.iter().find(|p| &p.id == package_id) {
                let crate_name = &package.name;

                for target in &package.targets {
                    if !target
                        .kind
                        .iter()
                        .any(|k| k == "lib" || k == "bin" || k == "proc-macro")
                    {
                        continue;
                    }

                    let src_path = &target.src_path;
                    let src_dir = src_path.parent().unwrap_or(src_path);
                    self.collect_rs_recursive(src_dir.as_std_path(), crate_name, &mut files)?;
                }
            }
        }

        Ok(files)
    }

    /// Manifest-only fallback: read `[workspace] members` and scan each
    /// member's `src/` directory.
    fn load_members_from_toml(&self, manifest_path: &str) -> Result<Vec<(String, String, String)>> {
        let toml_content = fs::read_to_string(manifest_path)
            .with_context(|| format!("Cannot read workspace manifest {}", manifest_path))?;
        let parsed: toml::Value =
            toml::from_str(&toml_content).context("Invalid workspace manifest")?;
        let root = Path::new(manifest_path)
            .parent()
            .context("Manifest has no parent directory")?;

        let mut files = Vec::new();

        let members = parsed
            .get("workspace")
            .and_then(|ws| ws.get("members"))
            .and_then(|m| m.as_array());

        match members {
            Some(members) => {
                for member in members {
                    let Some(member_path) = member.as_str() else { continue };
                    let member_dir = root.join(member_path);
                    let crate_name = member_dir
                        .file_name()
                        .map(|name| name.to_string_lossy().to_string())
                        .unwrap_or_else(|| member_path.to_string());
                    let src_dir = member_dir.join("src");
                    if src_dir.exists() {
                        self.collect_rs_recursive(&src_dir, &crate_name, &mut files)?;
                    }
                }
            }
            None => {
                // Single-package manifest: scan its src/ directly.
                let crate_name = parsed
                    .get("package")
                    .and_then(|p| p.get("name"))
                    .and_then(|n| n.as_str())
                    .unwrap_or("crate")
                    .to_string();
                let src_dir = root.join("src");
                if src_dir.exists() {
                    self.collect_rs_recursive(&src_dir, &crate_name, &mut files)?;
                }
            }
        }

        Ok(files)
    }

    fn collect_rs_recursive(
        &self,
        dir: &Path,
        crate_name: &str,
        out: &mut Vec<(String, String, String)>,
    ) -> Result<()> {
        if let Some(name) = dir.file_name().and_then(|name| name.to_str()) {
            if self.exclude_dirs.iter().any(|excluded| excluded == name) {
                return Ok(());
            }
        }
        if !dir.exists() {
            return Ok(());
        }

        if dir.is_file() {
            if let Some(ext) = dir.extension() {
                if ext == "rs" {
                    let content = fs::read_to_string(dir)
                        .with_context(|| format!("Failed to read file {}", dir.display()))?;
                    out.push((crate_name.to_string(), dir.display().to_string(), content));
                }
            }
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                self.collect_rs_recursive(&path, crate_name, out)?;
            } else if let Some(ext) = path.extension() {
                if ext == "rs" {
                    let content = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read file {}", path.display()))?;
                    out.push((crate_name.to_string(), path.display().to_string(), content));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_folder_skips_excluded_dirs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lib.rs"), "pub struct A;").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target/gen.rs"), "pub struct B;").unwrap();

        let loader = ProjectLoader::default();
        let files = loader.load_folder(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].1.ends_with("lib.rs"));
    }

    #[test]
    fn test_load_folder_with_extra_excludes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lib.rs"), "pub struct A;").unwrap();
        fs::create_dir(dir.path().join("generated")).unwrap();
        fs::write(dir.path().join("generated/gen.rs"), "pub struct B;").unwrap();

        let loader = ProjectLoader::with_excludes(&["generated".to_string()]);
        let files = loader.load_folder(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_toml_fallback_reads_members() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\"core\"]\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("core/src")).unwrap();
        fs::write(dir.path().join("core/src/lib.rs"), "pub struct Core;").unwrap();

        let loader = ProjectLoader::default();
        let files = loader
            .load_members_from_toml(dir.path().join("Cargo.toml").to_str().unwrap())
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "core");
    }

    #[test]
    fn test_toml_fallback_single_package() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"solo\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "pub struct Solo;").unwrap();

        let loader = ProjectLoader::default();
        let files = loader
            .load_members_from_toml(dir.path().join("Cargo.toml").to_str().unwrap())
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "solo");
    }

    #[test]
    fn test_load_files_uses_stem_as_crate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.rs");
        fs::write(&path, "pub struct P;").unwrap();

        let loader = ProjectLoader::default();
        let files = loader
            .load_files(&[path.to_string_lossy().to_string()])
            .unwrap();
        assert_eq!(files[0].0, "probe");
    }
}
