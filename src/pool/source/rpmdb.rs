/// The installed package database, read through the rpm CLI
use super::import_listing;
use crate::{
    pool::{BasicPkgIndex, PkgOrigin},
    utils::rpmparse::QUERY_FORMAT,
};
use anyhow::{bail, Context, Result};
use std::{path::Path, process::Command};

pub fn import(rpm: &str, root: &Path, index: &mut dyn BasicPkgIndex) -> Result<()> {
    let mut cmd = Command::new(rpm);
    cmd.arg("--root");
    cmd.arg(root.as_os_str());
    cmd.args(&["-qa", "--qf", QUERY_FORMAT]);

    let output = cmd
        .output()
        .context(format!("Failed to execute {}", rpm))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        match output.status.code() {
            Some(code) => bail!(
                "{} exited with non-zero return code {}: {}",
                rpm,
                code,
                stderr.trim()
            ),
            None => bail!("{} was terminated by signal", rpm),
        }
    }

    let content =
        String::from_utf8(output.stdout).context("rpm database listing is not valid UTF-8")?;
    import_listing(&content, PkgOrigin::Installed, index)?;

    Ok(())
}
