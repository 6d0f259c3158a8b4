pub mod command;
pub mod config;
mod version;

pub use command::{Command, QueryCommand};
pub use version::{is_capability_expr, Capability, CapabilityOp, Constraint, Evr};

/// One package record, as handed out by the package index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkgMeta {
    pub name: String,
    pub evr: Evr,
    pub arch: String,
    pub provides: Vec<Capability>,
}

impl PkgMeta {
    /// Check if this package satisfies `cap`, either through its explicit provides or
    /// the implicit `name = epoch:version-release` every package carries.
    pub fn provides(&self, cap: &Capability) -> bool {
        let self_provide = Constraint {
            op: CapabilityOp::Equal,
            evr: self.evr.clone(),
        };
        cap.is_satisfied_by(&self.name, Some(&self_provide))
            || self.provides.iter().any(|p| p.satisfies(cap))
    }
}

#[cfg(test)]
impl PkgMeta {
    pub fn fixture(name: &str, evr: &str, arch: &str, provides: &[&str]) -> Self {
        PkgMeta {
            name: name.to_owned(),
            evr: Evr::try_from(evr).unwrap(),
            arch: arch.to_owned(),
            provides: provides
                .iter()
                .map(|p| Capability::try_from(*p).unwrap())
                .collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pkg_provides() {
        let pkg = PkgMeta::fixture(
            "bash",
            "5.1-4",
            "x86_64",
            &["/bin/sh", "config(bash) = 5.1-4"],
        );
        let tests = vec![
            ("bash", true),
            ("bash >= 5.0", true),
            ("bash < 5.0", false),
            ("bash = 5.1-4", true),
            ("bash = 5.1-5", false),
            ("/bin/sh", true),
            ("config(bash) >= 5", true),
            ("config(bash) > 5.1-4", false),
            ("zsh", false),
        ];

        for (cap, expected) in tests {
            let cap = Capability::try_from(cap).unwrap();
            assert_eq!(pkg.provides(&cap), expected, "bash provides {}", cap);
        }
    }
}
