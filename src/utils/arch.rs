use crate::types::config::Config;

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use nix::sys::utsname::uname;
use std::collections::HashMap;

/// The platform-independent architecture
pub const NOARCH: &str = "noarch";

lazy_static! {
    // Native arch => arches it can run, best first
    static ref COMPAT_TABLE: HashMap<&'static str, Vec<&'static str>> = {
        let x86_64 = vec!["x86_64", "athlon", "i686", "i586", "i486", "i386"];
        let mut table = HashMap::new();
        for level in ["x86_64_v4", "x86_64_v3", "x86_64_v2"] {
            let mut arches = vec![level];
            match level {
                "x86_64_v4" => arches.extend(["x86_64_v3", "x86_64_v2"]),
                "x86_64_v3" => arches.push("x86_64_v2"),
                _ => (),
            }
            arches.extend(x86_64.iter());
            table.insert(level, arches);
        }
        table.insert("x86_64", x86_64);
        table.insert("amd64", vec!["x86_64", "athlon", "i686", "i586", "i486", "i386"]);
        table.insert("athlon", vec!["athlon", "i686", "i586", "i486", "i386"]);
        table.insert("i686", vec!["i686", "i586", "i486", "i386"]);
        table.insert("i586", vec!["i586", "i486", "i386"]);
        table.insert("i486", vec!["i486", "i386"]);
        table.insert("i386", vec!["i386"]);
        table.insert("aarch64", vec!["aarch64"]);
        table.insert("armv8l", vec!["armv7hl"]);
        table.insert("armv7l", vec!["armv7hl"]);
        table.insert("armv7hl", vec!["armv7hl"]);
        table.insert("ppc64le", vec!["ppc64le"]);
        table.insert("ppc64", vec!["ppc64", "ppc"]);
        table.insert("ppc", vec!["ppc"]);
        table.insert("s390x", vec!["s390x", "s390"]);
        table.insert("s390", vec!["s390"]);
        table.insert("riscv64", vec!["riscv64"]);
        table
    };
}

/// The native architecture and everything packages built for it may be tagged with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchInfo {
    native: String,
    // Includes noarch
    compatible: Vec<String>,
}

impl ArchInfo {
    pub fn new(arch: &str) -> Result<Self> {
        let arches = match COMPAT_TABLE.get(arch) {
            Some(a) => a,
            None => bail!("Unsupported architecture {}", arch),
        };
        let mut compatible: Vec<String> = arches.iter().map(|a| a.to_string()).collect();
        compatible.push(NOARCH.to_string());

        Ok(ArchInfo {
            // Map kernel machine names to the package arch
            native: arches[0].to_string(),
            compatible,
        })
    }

    /// Use the arch from config if set, otherwise ask the kernel
    pub fn detect(config: &Config) -> Result<Self> {
        match &config.arch {
            Some(arch) => ArchInfo::new(arch),
            None => ArchInfo::new(uname().machine()),
        }
    }

    pub fn native(&self) -> &str {
        &self.native
    }

    pub fn compatible(&self) -> &[String] {
        &self.compatible
    }

    pub fn is_compatible(&self, arch: &str) -> bool {
        self.compatible.iter().any(|a| a == arch)
    }
}
