use serde::{Deserialize, Deserializer};
use thiserror::Error;

const KNOWN_ACTIONS: &[&str] = &[
    "whatinstalled",
    "whatavailable",
    "versioncompare",
    "installonlypkgs",
    "flushcache",
];

/// Anything wrong with an input line. All of these are fatal for the worker.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed command: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("command has no action")]
    MissingAction,
    #[error("bad command: unknown action {0}")]
    UnknownAction(String),
}

/// One request line
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Command {
    WhatInstalled(QueryCommand),
    WhatAvailable(QueryCommand),
    VersionCompare { versions: [Option<String>; 2] },
    InstallOnlyPkgs { package: String },
    FlushCache,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct QueryCommand {
    pub provides: String,
    #[serde(default, deserialize_with = "deserialize_epoch")]
    pub epoch: Option<u64>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub enablerepos: Vec<String>,
    #[serde(default)]
    pub disablerepos: Vec<String>,
}

impl QueryCommand {
    /// Whether any of the structured NEVRA filters is present
    pub fn has_filters(&self) -> bool {
        self.epoch.is_some()
            || self.version.is_some()
            || self.release.is_some()
            || self.arch.is_some()
    }

    /// The first word of the specifier, used as package name in answers
    pub fn bare_name(&self) -> &str {
        self.provides.split_whitespace().next().unwrap_or("")
    }
}

// Callers send the epoch either as a number or as the string they split off a version
fn deserialize_epoch<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawEpoch {
        Number(u64),
        Text(String),
    }

    match Option::<RawEpoch>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawEpoch::Number(epoch)) => Ok(Some(epoch)),
        Some(RawEpoch::Text(epoch)) => epoch
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl TryFrom<&str> for Command {
    type Error = ProtocolError;

    fn try_from(line: &str) -> std::result::Result<Self, ProtocolError> {
        let raw: serde_json::Value = serde_json::from_str(line)?;
        let action = raw
            .get("action")
            .and_then(serde_json::Value::as_str)
            .ok_or(ProtocolError::MissingAction)?;
        if !KNOWN_ACTIONS.contains(&action) {
            return Err(ProtocolError::UnknownAction(action.to_owned()));
        }

        Ok(serde_json::from_value(raw)?)
    }
}
