use crate::{types::Evr, utils::arch::ArchInfo};

use anyhow::{Context, Result};
use std::cmp::Ordering;

/// Compare two versions the way rpm orders packages: -1, 0 or 1.
///
/// A missing version loses against a present one. `a` may carry an `.arch` suffix,
/// which is dropped when `b` does not end in an architecture.
pub fn compare_versions(arch: &ArchInfo, a: Option<&str>, b: Option<&str>) -> Result<i32> {
    let (a, b) = match (a, b) {
        (None, None) => return Ok(0),
        (Some(_), None) => return Ok(1),
        (None, Some(_)) => return Ok(-1),
        (Some(a), Some(b)) => (a, b),
    };

    let a = strip_arch(arch, a, b);
    let this = Evr::try_from(a).context(format!("Invalid version {}", a))?;
    let that = Evr::try_from(b).context(format!("Invalid version {}", b))?;

    Ok(match this.cmp(&that) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

fn last_token(s: &str) -> &str {
    s.rsplit('.').next().unwrap_or(s)
}

fn strip_arch<'a>(arch: &ArchInfo, a: &'a str, b: &str) -> &'a str {
    match a.rsplit_once('.') {
        Some((rest, tag)) if arch.is_compatible(tag) && !arch.is_compatible(last_token(b)) => {
            rest
        }
        _ => a,
    }
}
