/// Repository catalogs: package listings on disk, one per repository
use super::import_listing;
use crate::pool::{BasicPkgIndex, PkgOrigin};
use anyhow::{Context, Result};
use std::{fs, path::Path};

pub fn import(path: &Path, repo: &str, index: &mut dyn BasicPkgIndex) -> Result<()> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read catalog at {}", path.display()))?;
    import_listing(&content, PkgOrigin::Repo(repo.to_owned()), index)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        pool::{InMemoryIndex, Scope},
        utils::arch::ArchInfo,
    };
    use std::io::Write;

    #[test]
    fn read_catalog() {
        let path = std::env::temp_dir().join(format!(
            "rpm-helper-catalog-{}.list",
            std::process::id()
        ));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"htop\t(none)\t3.2.1\t1.el9\tx86_64\n").unwrap();
        drop(f);

        let mut index = InMemoryIndex::new(ArchInfo::new("x86_64").unwrap());
        index.add_repo("epel", true);
        import(&path, "epel", &mut index).unwrap();
        index.finalize();
        fs::remove_file(&path).unwrap();

        assert_eq!(index.get_pkgs_by_name(Scope::Available, "htop"), vec![0]);
        assert!(import(&path, "epel", &mut index).is_err());
    }
}
