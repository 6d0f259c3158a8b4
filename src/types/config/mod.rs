mod repo;
pub use repo::RepoConfig;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Override the native architecture
    #[serde(default)]
    pub arch: Option<String>,
    /// rpm binary used to read the installed package database
    #[serde(default = "default_rpm")]
    pub rpm: String,
    #[serde(default = "default_installonlypkgs")]
    pub installonlypkgs: Vec<String>,
    #[serde(default)]
    pub repo: BTreeMap<String, RepoConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: default_root(),
            arch: None,
            rpm: default_rpm(),
            installonlypkgs: default_installonlypkgs(),
            repo: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Read config from `path`. A missing file means the built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path)
            .context(format!("Failed to read config file at {}", path.display()))?;
        let config: Config = toml::from_str(&data)
            .context(format!("Failed to parse config file at {}", path.display()))?;
        config.check_sanity()?;
        Ok(config)
    }

    pub fn check_sanity(&self) -> Result<()> {
        lazy_static! {
            static ref REPO_ID: Regex = Regex::new("^[a-zA-Z0-9_.:-]+$").unwrap();
            static ref ARCH: Regex = Regex::new("^[a-zA-Z0-9_]+$").unwrap();
        }

        if let Some(arch) = &self.arch {
            if !ARCH.is_match(arch) {
                bail!("Invalid architecture {}", arch);
            }
        }

        for (name, repo) in &self.repo {
            if !REPO_ID.is_match(name) {
                bail!("Invalid character in repository id {}", name);
            }
            repo.check_sanity(name)?;
        }
        Ok(())
    }

    pub fn is_installonly(&self, name: &str) -> bool {
        self.installonlypkgs.iter().any(|pkg| pkg == name)
    }
}

#[inline]
fn default_root() -> PathBuf {
    PathBuf::from("/")
}

#[inline]
fn default_rpm() -> String {
    "rpm".to_string()
}

fn default_installonlypkgs() -> Vec<String> {
    [
        "kernel",
        "kernel-bigmem",
        "installonlypkg(kernel-module)",
        "installonlypkg(vm)",
        "kernel-enterprise",
        "kernel-smp",
        "kernel-debug",
        "kernel-unsupported",
        "kernel-source",
        "kernel-devel",
        "kernel-PAE",
        "kernel-PAE-debug",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Opts {
    #[clap(
        long,
        default_value = "/etc/rpm-helper/config.toml",
        help = "Position of the config file"
    )]
    pub config: PathBuf,
    #[clap(short, long, help = "Print additional debug information to stderr")]
    pub verbose: bool,
    /// File descriptor to read commands from (default: stdin)
    #[clap(requires = "outfd")]
    pub infd: Option<i32>,
    /// File descriptor to write answers to (default: stdout)
    pub outfd: Option<i32>,
}
