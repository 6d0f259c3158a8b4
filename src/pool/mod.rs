mod in_memory;
pub mod source;
pub use in_memory::InMemoryIndex;

use crate::{
    debug,
    types::{Capability, PkgMeta},
    utils::arch::ArchInfo,
};

use anyhow::{bail, Result};
use glob::Pattern;
use std::collections::BTreeSet;
use std::fmt;

/// Where a record came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PkgOrigin {
    Installed,
    Repo(String),
}

impl fmt::Display for PkgOrigin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PkgOrigin::Installed => write!(f, "@System"),
            PkgOrigin::Repo(id) => write!(f, "{}", id),
        }
    }
}

/// Which half of the index a query looks at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// The installed package database
    Installed,
    /// Packages from enabled repositories
    Available,
}

/// Structured NEVRA filter. Every field is a shell-style glob, `None` matches anything.
#[derive(Clone, Debug, Default)]
pub struct NevraQuery {
    pub name: String,
    pub epoch: Option<u64>,
    pub version: Option<String>,
    pub release: Option<String>,
    pub arch: Option<String>,
}

/// A shell-style glob, or a literal string if it has no metacharacters or is not a
/// valid pattern (e.g. the file provide `/usr/bin/[`)
#[derive(Clone, Debug)]
pub enum Matcher {
    Glob(Pattern),
    Literal(String),
}

impl Matcher {
    pub fn new(pattern: &str) -> Self {
        if !is_glob(pattern) {
            return Matcher::Literal(pattern.to_owned());
        }
        match Pattern::new(pattern) {
            Ok(p) => Matcher::Glob(p),
            Err(e) => {
                debug!("Treating {} as a literal: {}", pattern, e);
                Matcher::Literal(pattern.to_owned())
            }
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, Matcher::Glob(_))
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Glob(p) => p.matches(value),
            Matcher::Literal(s) => s == value,
        }
    }
}

struct CompiledNevra {
    name: Matcher,
    epoch: Option<u64>,
    version: Option<Matcher>,
    release: Option<Matcher>,
    arch: Option<Matcher>,
}

impl NevraQuery {
    fn compile(&self) -> CompiledNevra {
        CompiledNevra {
            name: Matcher::new(&self.name),
            epoch: self.epoch,
            version: self.version.as_deref().map(Matcher::new),
            release: self.release.as_deref().map(Matcher::new),
            arch: self.arch.as_deref().map(Matcher::new),
        }
    }
}

impl CompiledNevra {
    fn matches(&self, pkg: &PkgMeta) -> bool {
        fn field(matcher: &Option<Matcher>, value: &str) -> bool {
            matcher.as_ref().map_or(true, |m| m.matches(value))
        }

        self.name.matches(&pkg.name)
            && self
                .epoch
                .map_or(true, |e| pkg.evr.epoch.unwrap_or(0) == e)
            && field(&self.version, &pkg.evr.version)
            && field(&self.release, &pkg.evr.release)
            && field(&self.arch, &pkg.arch)
    }
}

/// Whether a name contains glob metacharacters
pub fn is_glob(s: &str) -> bool {
    s.contains(|c: char| c == '*' || c == '?' || c == '[')
}

fn retain_matching<P: BasicPkgIndex + ?Sized>(
    index: &P,
    ids: Vec<usize>,
    q: &CompiledNevra,
) -> Vec<usize> {
    ids.into_iter()
        .filter(|id| index.get_pkg_by_id(*id).map_or(false, |pkg| q.matches(pkg)))
        .collect()
}

/// The basic PkgIndex interface
pub trait BasicPkgIndex {
    // Register a repository, must be called before adding its packages
    fn add_repo(&mut self, id: &str, enabled: bool);
    // Add a package to the index
    fn add(&mut self, origin: PkgOrigin, meta: PkgMeta) -> usize;
    // Finalize the index, must call before using the index
    fn finalize(&mut self);
    // Get PkgMeta from Pkg ID
    fn get_pkg_by_id(&self, id: usize) -> Option<&PkgMeta>;
    // Get an Iterator of (PkgId, PkgMeta) visible in scope
    fn pkgid_iter(&self, scope: Scope) -> Box<dyn Iterator<Item = (usize, &PkgMeta)> + '_>;
    // Get IDs of packages named `name` visible in scope, best version first
    fn get_pkgs_by_name(&self, scope: Scope, name: &str) -> Vec<usize>;
    // Get IDs of packages visible in scope that provide `cap`
    fn get_pkgs_by_provide(&self, scope: Scope, cap: &Capability) -> Vec<usize>;
    // All known repository ids
    fn repos(&self) -> Vec<String>;
    fn enabled_repos(&self) -> BTreeSet<String>;
    fn set_repo_enabled(&mut self, id: &str, enabled: bool) -> Result<()>;
    fn arch(&self) -> &ArchInfo;
}

/// Additional tools
pub trait PkgIndex: BasicPkgIndex {
    fn query_nevra(&self, scope: Scope, query: &NevraQuery) -> Vec<usize> {
        let q = query.compile();
        let candidates: Vec<usize> = if q.name.is_glob() {
            self.pkgid_iter(scope).map(|(id, _)| id).collect()
        } else {
            self.get_pkgs_by_name(scope, &query.name)
        };

        retain_matching(self, candidates, &q)
    }

    /// Keep the packages in `ids` that match `query`
    fn filter_nevra(&self, ids: Vec<usize>, query: &NevraQuery) -> Vec<usize> {
        retain_matching(self, ids, &query.compile())
    }

    fn query_name(&self, scope: Scope, pattern: &str) -> Vec<usize> {
        match Matcher::new(pattern) {
            Matcher::Glob(p) => self
                .pkgid_iter(scope)
                .filter(|(_, pkg)| p.matches(&pkg.name))
                .map(|(id, _)| id)
                .collect(),
            Matcher::Literal(name) => self.get_pkgs_by_name(scope, &name),
        }
    }

    /// Enable or disable every repository matching `pattern`
    fn toggle_repos(&mut self, pattern: &str, enabled: bool) -> Result<()> {
        let p = Matcher::new(pattern);
        let matched: Vec<String> = self
            .repos()
            .into_iter()
            .filter(|id| p.matches(id))
            .collect();
        if matched.is_empty() {
            bail!("Unknown repository {}", pattern);
        }
        for id in matched {
            self.set_repo_enabled(&id, enabled)?;
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub fn fixture_index() -> InMemoryIndex {
        let mut index = InMemoryIndex::new(ArchInfo::new("x86_64").unwrap());
        index.add_repo("baseos", true);
        index.add_repo("appstream", true);
        index.add_repo("epel", false);

        let installed = vec![
            PkgMeta::fixture("bash", "5.1.8-4.el9", "x86_64", &["/bin/sh"]),
            PkgMeta::fixture("kernel", "5.14.0-70.el9", "x86_64", &[]),
            PkgMeta::fixture("kernel", "5.14.0-162.el9", "x86_64", &[]),
            PkgMeta::fixture("glibc", "2.34-40.el9", "x86_64", &["libc.so.6()(64bit)"]),
            PkgMeta::fixture("glibc", "2.34-40.el9", "i686", &["libc.so.6"]),
            PkgMeta::fixture("tzdata", "2022a-1.el9", "noarch", &[]),
        ];
        for pkg in installed {
            index.add(PkgOrigin::Installed, pkg);
        }

        let available = vec![
            ("baseos", PkgMeta::fixture("bash", "5.1.8-6.el9", "x86_64", &["/bin/sh"])),
            ("baseos", PkgMeta::fixture("glibc", "2.34-60.el9", "x86_64", &["libc.so.6()(64bit)"])),
            ("baseos", PkgMeta::fixture("glibc", "2.34-60.el9", "i686", &["libc.so.6"])),
            ("baseos", PkgMeta::fixture("kernel", "5.14.0-284.el9", "x86_64", &[])),
            (
                "appstream",
                PkgMeta::fixture(
                    "perl-interpreter",
                    "4:5.32.1-480.el9",
                    "x86_64",
                    &["perl(:VERSION) = 5.32.1", "/usr/bin/perl"],
                ),
            ),
            ("appstream", PkgMeta::fixture("nginx", "1:1.20.1-13.el9", "x86_64", &["webserver"])),
            ("appstream", PkgMeta::fixture("httpd", "2.4.53-7.el9", "x86_64", &["webserver"])),
            ("epel", PkgMeta::fixture("htop", "3.2.1-1.el9", "x86_64", &[])),
            ("epel", PkgMeta::fixture("nginx", "1:1.24.0-1.el9", "x86_64", &["webserver"])),
        ];
        for (repo, pkg) in available {
            index.add(PkgOrigin::Repo(repo.to_string()), pkg);
        }

        index.finalize();
        index
    }

    fn names(index: &InMemoryIndex, ids: &[usize]) -> Vec<String> {
        ids.iter()
            .map(|id| {
                let pkg = index.get_pkg_by_id(*id).unwrap();
                format!("{}-{}.{}", pkg.name, pkg.evr, pkg.arch)
            })
            .collect()
    }

    #[test]
    fn by_name_sorted() {
        let index = fixture_index();
        let ids = index.get_pkgs_by_name(Scope::Installed, "kernel");
        assert_eq!(
            names(&index, &ids),
            vec!["kernel-5.14.0-162.el9.x86_64", "kernel-5.14.0-70.el9.x86_64"]
        );
        let ids = index.get_pkgs_by_name(Scope::Available, "kernel");
        assert_eq!(names(&index, &ids), vec!["kernel-5.14.0-284.el9.x86_64"]);
        assert!(index.get_pkgs_by_name(Scope::Available, "htop").is_empty());
        assert!(index.get_pkgs_by_name(Scope::Installed, "nothing").is_empty());
    }

    #[test]
    fn nevra_query() {
        let index = fixture_index();
        let tests = vec![
            (
                NevraQuery {
                    name: "glibc".to_string(),
                    arch: Some("i686".to_string()),
                    ..Default::default()
                },
                vec!["glibc-2.34-40.el9.i686"],
            ),
            (
                NevraQuery {
                    name: "kernel".to_string(),
                    version: Some("5.14.0".to_string()),
                    release: Some("70.*".to_string()),
                    ..Default::default()
                },
                vec!["kernel-5.14.0-70.el9.x86_64"],
            ),
            (
                NevraQuery {
                    name: "ker*".to_string(),
                    epoch: Some(0),
                    release: Some("162.el9".to_string()),
                    ..Default::default()
                },
                vec!["kernel-5.14.0-162.el9.x86_64"],
            ),
            (
                NevraQuery {
                    name: "bash".to_string(),
                    epoch: Some(1),
                    ..Default::default()
                },
                vec![],
            ),
        ];

        for (query, expected) in tests {
            let ids = index.query_nevra(Scope::Installed, &query);
            assert_eq!(names(&index, &ids), expected, "{:?}", query);
        }
    }

    #[test]
    fn name_query() {
        let index = fixture_index();
        let ids = index.query_name(Scope::Available, "ng*");
        assert_eq!(names(&index, &ids), vec!["nginx-1:1.20.1-13.el9.x86_64"]);
        let ids = index.query_name(Scope::Installed, "tzdata");
        assert_eq!(names(&index, &ids), vec!["tzdata-2022a-1.el9.noarch"]);
        // Not a valid glob, looked up as is
        assert!(index.query_name(Scope::Installed, "[").is_empty());
    }

    #[test]
    fn matcher() {
        let tests = vec![
            ("bash", "bash", true, false),
            ("ba?h", "bash", true, true),
            ("*.el9", "5.el9", true, true),
            ("[bc]ash", "cash", true, true),
            // Unterminated class, compared literally
            ("/usr/bin/[", "/usr/bin/[", true, false),
            ("8.[3", "8.32", false, false),
        ];
        for (pattern, value, expected, glob) in tests {
            let m = Matcher::new(pattern);
            assert_eq!(m.matches(value), expected, "{} vs {}", pattern, value);
            assert_eq!(m.is_glob(), glob, "{}", pattern);
        }

        assert_eq!(PkgOrigin::Installed.to_string(), "@System");
        assert_eq!(PkgOrigin::Repo("epel".to_string()).to_string(), "epel");
    }

    #[test]
    fn provide_query() {
        let index = fixture_index();
        let cap = Capability::try_from("webserver").unwrap();
        let ids = index.get_pkgs_by_provide(Scope::Available, &cap);
        assert_eq!(ids.len(), 2);
        let cap = Capability::try_from("perl(:VERSION) >= 5.30").unwrap();
        let ids = index.get_pkgs_by_provide(Scope::Available, &cap);
        assert_eq!(names(&index, &ids), vec!["perl-interpreter-4:5.32.1-480.el9.x86_64"]);
        // Self provide
        let cap = Capability::try_from("bash > 5.1.8-4.el9").unwrap();
        let ids = index.get_pkgs_by_provide(Scope::Installed, &cap);
        assert!(ids.is_empty());
    }

    #[test]
    fn toggle_repos() {
        let mut index = fixture_index();
        index.toggle_repos("epel", true).unwrap();
        let cap = Capability::try_from("webserver").unwrap();
        assert_eq!(index.get_pkgs_by_provide(Scope::Available, &cap).len(), 3);

        index.toggle_repos("*", false).unwrap();
        assert!(index.enabled_repos().is_empty());
        assert!(index.pkgid_iter(Scope::Available).next().is_none());
        // Installed packages do not care
        assert_eq!(index.pkgid_iter(Scope::Installed).count(), 6);

        assert!(index.toggle_repos("updates", true).is_err());
    }
}
