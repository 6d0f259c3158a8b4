use crate::{
    debug,
    pool::{Matcher, NevraQuery, PkgIndex, Scope},
    repo::RepoScope,
    types::{is_capability_expr, Capability, PkgMeta, QueryCommand},
    utils::arch::{ArchInfo, NOARCH},
};

use anyhow::Result;
use std::collections::BTreeMap;

/// Answer a whatinstalled/whatavailable query, with the requested repositories toggled
/// for the duration of the lookup.
pub fn query(index: &mut dyn PkgIndex, scope: Scope, cmd: &QueryCommand) -> Result<String> {
    let index = RepoScope::enter(index, &cmd.enablerepos, &cmd.disablerepos)?;
    let pkg = resolve(&*index, scope, cmd);

    Ok(format_answer(cmd, pkg))
}

/// `name epoch:version-release arch`, or `name nil nil` when nothing matched
pub fn format_answer(cmd: &QueryCommand, pkg: Option<&PkgMeta>) -> String {
    match pkg {
        Some(pkg) => format!(
            "{} {} {}",
            pkg.name,
            pkg.evr.to_canonical_string(),
            pkg.arch
        ),
        None => format!("{} nil nil", cmd.bare_name()),
    }
}

/// Find the single package that best matches `cmd`.
///
/// Candidates come from the first strategy that finds anything:
/// structured NEVRA filters, then the specifier as a name glob (or a NEVRA string),
/// then the specifier as a capability.
pub fn resolve<'i>(
    index: &'i dyn PkgIndex,
    scope: Scope,
    cmd: &QueryCommand,
) -> Option<&'i PkgMeta> {
    let spec = cmd.provides.trim();
    let name = cmd.bare_name();
    if name.is_empty() {
        return None;
    }
    let hint = Matcher::new(cmd.arch.as_deref().unwrap_or_else(|| index.arch().native()));
    let filters = NevraQuery {
        name: name.to_owned(),
        epoch: cmd.epoch,
        version: cmd.version.clone(),
        release: cmd.release.clone(),
        arch: cmd.arch.clone(),
    };

    let mut candidates = Vec::new();
    if cmd.has_filters() {
        candidates = index.query_nevra(scope, &filters);
        if candidates.is_empty() && scope == Scope::Installed {
            debug!("No exact match for {}, retrying with name and arch", spec);
            candidates = index
                .query_name(scope, name)
                .into_iter()
                .filter(|id| {
                    index
                        .get_pkg_by_id(*id)
                        .map_or(false, |pkg| is_preferred_arch(&hint, &pkg.arch))
                })
                .collect();
        }
    }

    if candidates.is_empty() && !cmd.has_filters() && !is_capability_expr(spec) {
        candidates = index.query_name(scope, spec);
        if candidates.is_empty() {
            candidates = query_nevra_string(index, scope, spec);
        }
    }

    if candidates.is_empty() {
        match Capability::try_from(spec) {
            Ok(cap) => {
                candidates = index.get_pkgs_by_provide(scope, &cap);
                if cmd.has_filters() {
                    let filters = NevraQuery {
                        name: "*".to_string(),
                        ..filters
                    };
                    candidates = index.filter_nevra(candidates, &filters);
                }
            }
            Err(e) => debug!("Not a capability: {}", e),
        }
    }

    let pkgs: Vec<&PkgMeta> = candidates
        .into_iter()
        .filter_map(|id| index.get_pkg_by_id(id))
        .collect();

    // Only narrow down to the preferred arches if that leaves something
    let preferred: Vec<&PkgMeta> = pkgs
        .iter()
        .filter(|pkg| is_preferred_arch(&hint, &pkg.arch))
        .copied()
        .collect();
    let pkgs = if preferred.is_empty() { pkgs } else { preferred };

    pick_best(pkgs, name, &hint)
}

fn is_preferred_arch(hint: &Matcher, arch: &str) -> bool {
    arch == NOARCH || hint.matches(arch)
}

// Lower is better
fn arch_rank(hint: &Matcher, arch: &str) -> u8 {
    if hint.matches(arch) {
        0
    } else if arch == NOARCH {
        1
    } else {
        2
    }
}

/// Highest EVR per name, then the package named `name` if there is one,
/// otherwise the highest EVR overall.
fn pick_best<'i>(pkgs: Vec<&'i PkgMeta>, name: &str, hint: &Matcher) -> Option<&'i PkgMeta> {
    let mut best: BTreeMap<&str, &PkgMeta> = BTreeMap::new();
    for pkg in pkgs {
        let better = match best.get(pkg.name.as_str()) {
            Some(current) => match pkg.evr.cmp(&current.evr) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Equal => {
                    arch_rank(hint, &pkg.arch) < arch_rank(hint, &current.arch)
                }
                std::cmp::Ordering::Less => false,
            },
            None => true,
        };
        if better {
            best.insert(&pkg.name, pkg);
        }
    }

    if let Some(pkg) = best.get(name) {
        return Some(*pkg);
    }
    if best.len() > 1 {
        debug!(
            "Multiple packages match {}: {}",
            name,
            best.keys().copied().collect::<Vec<_>>().join(", ")
        );
    }
    // Ties go to the alphabetically first name
    best.into_values().fold(None, |res, pkg| match res {
        Some(current) if pkg.evr <= current.evr => Some(current),
        _ => Some(pkg),
    })
}

/// Read `spec` as `name[-[epoch:]version[-release]][.arch]`, trying the same forms rpm
/// accepts on its command line, longest first.
fn query_nevra_string(index: &dyn PkgIndex, scope: Scope, spec: &str) -> Vec<usize> {
    for query in nevra_forms(index.arch(), spec) {
        let ids = index.query_nevra(scope, &query);
        if !ids.is_empty() {
            debug!("{} matched as {:?}", spec, query);
            return ids;
        }
    }

    Vec::new()
}

fn split_arch<'s>(arch: &ArchInfo, s: &'s str) -> Option<(&'s str, &'s str)> {
    s.rsplit_once('.')
        .filter(|(rest, tag)| !rest.is_empty() && arch.is_compatible(tag))
}

fn split_ev(ev: &str) -> Option<(Option<u64>, String)> {
    match ev.split_once(':') {
        Some((epoch, version)) => Some((Some(epoch.parse().ok()?), version.to_owned())),
        None => Some((None, ev.to_owned())),
    }
}

fn nevra_forms(arch: &ArchInfo, spec: &str) -> Vec<NevraQuery> {
    let mut forms = Vec::new();
    // NEVRA and NA
    if let Some((rest, a)) = split_arch(arch, spec) {
        if let Some((nev, release)) = rest.rsplit_once('-') {
            if let Some((n, ev)) = nev.rsplit_once('-') {
                if let Some((epoch, version)) = split_ev(ev) {
                    forms.push(NevraQuery {
                        name: n.to_owned(),
                        epoch,
                        version: Some(version),
                        release: Some(release.to_owned()),
                        arch: Some(a.to_owned()),
                    });
                }
            }
        }
        forms.push(NevraQuery {
            name: rest.to_owned(),
            arch: Some(a.to_owned()),
            ..Default::default()
        });
    }
    // NEVR
    if let Some((nev, release)) = spec.rsplit_once('-') {
        if let Some((n, ev)) = nev.rsplit_once('-') {
            if let Some((epoch, version)) = split_ev(ev) {
                forms.push(NevraQuery {
                    name: n.to_owned(),
                    epoch,
                    version: Some(version),
                    release: Some(release.to_owned()),
                    arch: None,
                });
            }
        }
    }
    // NEV
    if let Some((n, ev)) = spec.rsplit_once('-') {
        if let Some((epoch, version)) = split_ev(ev) {
            forms.push(NevraQuery {
                name: n.to_owned(),
                epoch,
                version: Some(version),
                ..Default::default()
            });
        }
    }

    forms.retain(|q| !q.name.is_empty());
    forms
}
