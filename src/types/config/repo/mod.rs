use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Package listing of this repository, one package per line
    pub catalog: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl RepoConfig {
    pub fn check_sanity(&self, name: &str) -> Result<()> {
        if self.catalog.trim().is_empty() {
            bail!("Repository {} has an empty catalog path", name)
        }

        Ok(())
    }

    /// Get the path of the catalog for this repository
    pub fn get_catalog_path(&self, name: &str, arch: &str, root: &Path) -> PathBuf {
        // Replace variables
        // $repo: Repository name
        // $arch: Current system architecture
        let path = self.catalog.replace("$repo", name).replace("$arch", arch);
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            root.join(path)
        }
    }
}

#[inline]
fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn catalog_path() {
        let repo = RepoConfig {
            catalog: "/var/cache/rpm-helper/$repo-$arch.list".to_string(),
            enabled: true,
        };
        assert_eq!(
            repo.get_catalog_path("updates", "x86_64", Path::new("/")),
            PathBuf::from("/var/cache/rpm-helper/updates-x86_64.list")
        );

        let repo = RepoConfig {
            catalog: "var/cache/$repo.list".to_string(),
            enabled: false,
        };
        assert_eq!(
            repo.get_catalog_path("epel", "aarch64", Path::new("/mnt/sysroot")),
            PathBuf::from("/mnt/sysroot/var/cache/epel.list")
        );
    }
}
