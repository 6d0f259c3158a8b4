use super::{BasicPkgIndex, PkgIndex, PkgOrigin, Scope};
use crate::{
    types::{Capability, PkgMeta},
    utils::arch::ArchInfo,
};

use anyhow::{bail, Result};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub struct InMemoryIndex {
    pkgs: Vec<(PkgOrigin, PkgMeta)>,
    // The id of packages for each name, sorted by version
    name_to_ids: HashMap<String, Vec<usize>>,
    // Repository id => enabled
    repos: BTreeMap<String, bool>,
    arch: ArchInfo,
}

impl InMemoryIndex {
    pub fn new(arch: ArchInfo) -> Self {
        InMemoryIndex {
            pkgs: Vec::new(),
            name_to_ids: HashMap::new(),
            repos: BTreeMap::new(),
            arch,
        }
    }

    fn is_visible(&self, scope: Scope, origin: &PkgOrigin) -> bool {
        match (scope, origin) {
            (Scope::Installed, PkgOrigin::Installed) => true,
            (Scope::Available, PkgOrigin::Repo(id)) => {
                self.repos.get(id).copied().unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl BasicPkgIndex for InMemoryIndex {
    fn add_repo(&mut self, id: &str, enabled: bool) {
        self.repos.insert(id.to_owned(), enabled);
    }

    fn add(&mut self, origin: PkgOrigin, meta: PkgMeta) -> usize {
        let index = self.pkgs.len();
        self.name_to_ids
            .entry(meta.name.clone())
            .or_insert_with(Vec::new)
            .push(index);
        self.pkgs.push((origin, meta));

        index
    }

    fn finalize(&mut self) {
        let pkgs = &self.pkgs;
        self.name_to_ids.iter_mut().for_each(|(_, ids)| {
            // Sort in descending order
            ids.sort_by(|a, b| pkgs[*b].1.evr.cmp(&pkgs[*a].1.evr));
        });
    }

    fn get_pkg_by_id(&self, id: usize) -> Option<&PkgMeta> {
        self.pkgs.get(id).map(|(_, meta)| meta)
    }

    fn pkgid_iter(&self, scope: Scope) -> Box<dyn Iterator<Item = (usize, &PkgMeta)> + '_> {
        Box::new(
            self.pkgs
                .iter()
                .enumerate()
                .filter(move |(_, (origin, _))| self.is_visible(scope, origin))
                .map(|(id, (_, meta))| (id, meta)),
        )
    }

    fn get_pkgs_by_name(&self, scope: Scope, name: &str) -> Vec<usize> {
        match self.name_to_ids.get(name) {
            Some(ids) => ids
                .iter()
                .filter(|id| self.is_visible(scope, &self.pkgs[**id].0))
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }

    fn get_pkgs_by_provide(&self, scope: Scope, cap: &Capability) -> Vec<usize> {
        self.pkgs
            .par_iter()
            .enumerate()
            .filter(|(_, (origin, pkg))| self.is_visible(scope, origin) && pkg.provides(cap))
            .map(|(id, _)| id)
            .collect()
    }

    fn repos(&self) -> Vec<String> {
        self.repos.keys().cloned().collect()
    }

    fn enabled_repos(&self) -> BTreeSet<String> {
        self.repos
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn set_repo_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        match self.repos.get_mut(id) {
            Some(state) => {
                *state = enabled;
                Ok(())
            }
            None => bail!("Unknown repository {}", id),
        }
    }

    fn arch(&self) -> &ArchInfo {
        &self.arch
    }
}

impl PkgIndex for InMemoryIndex {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_and_origins() {
        let mut index = InMemoryIndex::new(ArchInfo::new("aarch64").unwrap());
        index.add_repo("baseos", true);
        let a = index.add(
            PkgOrigin::Installed,
            PkgMeta::fixture("a", "1.0-1", "aarch64", &[]),
        );
        let b = index.add(
            PkgOrigin::Repo("baseos".to_string()),
            PkgMeta::fixture("a", "1.1-1", "aarch64", &[]),
        );
        // Unknown repositories are never visible
        let c = index.add(
            PkgOrigin::Repo("ghost".to_string()),
            PkgMeta::fixture("a", "9.9-1", "aarch64", &[]),
        );
        index.finalize();

        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(index.get_pkg_by_id(1).unwrap().evr.version, "1.1");
        assert!(index.get_pkg_by_id(3).is_none());
        assert_eq!(index.get_pkgs_by_name(Scope::Installed, "a"), vec![0]);
        assert_eq!(index.get_pkgs_by_name(Scope::Available, "a"), vec![1]);
        assert_eq!(index.arch().native(), "aarch64");

        assert!(index.set_repo_enabled("ghost", true).is_err());
        index.set_repo_enabled("baseos", false).unwrap();
        assert!(index.get_pkgs_by_name(Scope::Available, "a").is_empty());
    }
}
