mod capability;
mod ord;
mod parse;
mod test;

pub use capability::{is_capability_expr, Capability, CapabilityOp, Constraint};

use std::fmt;

/// An epoch-version-release triple, the unit rpm orders packages by.
///
/// An absent epoch orders like epoch 0, and an empty release means "no release".
#[derive(Clone, Debug, Default)]
pub struct Evr {
    pub epoch: Option<u64>,
    pub version: String,
    pub release: String,
}

impl Evr {
    pub fn new(epoch: Option<u64>, version: &str, release: &str) -> Self {
        Evr {
            epoch,
            version: version.to_owned(),
            release: release.to_owned(),
        }
    }

    /// `epoch:version-release`, with the epoch always spelled out
    pub fn to_canonical_string(&self) -> String {
        format!(
            "{}:{}-{}",
            self.epoch.unwrap_or(0),
            self.version,
            self.release
        )
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(epoch) = self.epoch {
            write!(f, "{}:", epoch)?;
        }
        write!(f, "{}", self.version)?;
        if !self.release.is_empty() {
            write!(f, "-{}", self.release)?;
        }
        Ok(())
    }
}
