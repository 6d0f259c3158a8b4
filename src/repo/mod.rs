use crate::{debug, pool::PkgIndex, warn};

use anyhow::Result;
use std::{
    collections::BTreeSet,
    ops::{Deref, DerefMut},
};

/// Repository toggles that only last for one query.
///
/// Entering takes a snapshot of the enabled repositories. Dropping the scope puts the
/// index back into exactly that state, whether the query succeeded or not.
pub struct RepoScope<'a> {
    index: &'a mut dyn PkgIndex,
    snapshot: BTreeSet<String>,
}

impl<'a> RepoScope<'a> {
    /// Apply `enable`, then `disable`. A repository in both lists ends up disabled.
    pub fn enter(
        index: &'a mut dyn PkgIndex,
        enable: &[String],
        disable: &[String],
    ) -> Result<Self> {
        let snapshot = index.enabled_repos();
        let scope = RepoScope { index, snapshot };

        for pattern in enable {
            debug!("Enabling repository {} for this query", pattern);
            scope.index.toggle_repos(pattern, true)?;
        }
        for pattern in disable {
            debug!("Disabling repository {} for this query", pattern);
            scope.index.toggle_repos(pattern, false)?;
        }

        Ok(scope)
    }

    fn restore(&mut self) -> Result<()> {
        let current = self.index.enabled_repos();
        for id in self.snapshot.difference(&current) {
            self.index.set_repo_enabled(id, true)?;
        }
        for id in current.difference(&self.snapshot) {
            self.index.set_repo_enabled(id, false)?;
        }

        Ok(())
    }
}

impl<'a> Deref for RepoScope<'a> {
    type Target = dyn PkgIndex + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.index
    }
}

impl<'a> DerefMut for RepoScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.index
    }
}

impl Drop for RepoScope<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore repository state: {}", e);
        }
    }
}
