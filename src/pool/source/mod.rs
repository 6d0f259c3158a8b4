pub mod catalog;
pub mod rpmdb;

use super::{BasicPkgIndex, InMemoryIndex, PkgIndex, PkgOrigin};
use crate::{debug, info, types::config::Config, utils::arch::ArchInfo, utils::rpmparse};
use anyhow::{Context, Result};
use rayon::prelude::*;

/// Build the index from the installed database and every configured repository catalog
pub fn create_index(config: &Config, arch: &ArchInfo) -> Result<Box<dyn PkgIndex>> {
    let mut index = InMemoryIndex::new(arch.clone());

    info!("Reading installed package database...");
    rpmdb::import(&config.rpm, &config.root, &mut index)
        .context("Failed to read installed package database")?;

    for (id, repo) in &config.repo {
        index.add_repo(id, repo.enabled);
        let path = repo.get_catalog_path(id, arch.native(), &config.root);
        info!("Reading catalog of repository {}...", id);
        catalog::import(&path, id, &mut index)
            .context(format!("Failed to read catalog of repository {}", id))?;
    }

    index.finalize();
    Ok(Box::new(index))
}

/// Parse a listing and put every package into `index`, returns the number of packages added
pub(crate) fn import_listing(
    content: &str,
    origin: PkgOrigin,
    index: &mut dyn BasicPkgIndex,
) -> Result<usize> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .collect();
    let pkgs: Result<Vec<_>> = lines
        .par_iter()
        .map(|(no, line)| {
            rpmparse::parse_listing_line(line).context(format!("Bad listing on line {}", no + 1))
        })
        .collect();
    let pkgs = pkgs?;

    let count = pkgs.len();
    debug!("Imported {} packages from {}", count, origin);
    for pkg in pkgs {
        index.add(origin.clone(), pkg);
    }
    Ok(count)
}
