/// Parse one-package-per-line listings, as produced by `rpm -qa --qf` with `QUERY_FORMAT`
use crate::{
    debug,
    types::{Capability, Evr, PkgMeta},
};
use anyhow::{bail, format_err, Result};
use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::eof,
    multi::separated_list1,
    sequence::terminated,
    IResult,
};

/// Query format handed to rpm so that its output matches what `parse_listing_line` reads
pub const QUERY_FORMAT: &str = concat!(
    "%{NAME}\\t%{EPOCH}\\t%{VERSION}\\t%{RELEASE}\\t%{ARCH}",
    "[\\t%{PROVIDENAME} %{PROVIDEFLAGS:depflags} %{PROVIDEVERSION}]\\n",
);

fn fields(i: &str) -> IResult<&str, Vec<&str>> {
    terminated(separated_list1(char('\t'), take_till(|c: char| c == '\t')), eof)(i)
}

fn parse_epoch(name: &str, epoch: &str) -> Result<Option<u64>> {
    match epoch.trim() {
        "" | "(none)" => Ok(None),
        e => e
            .parse()
            .map(Some)
            .map_err(|_| format_err!("bad listing for {}: invalid epoch {}", name, e)),
    }
}

/// Parse a line like `bash\t(none)\t5.1.8\t4.el9\tx86_64\tbash = 5.1.8-4.el9\t/bin/sh`
pub fn parse_listing_line(line: &str) -> Result<PkgMeta> {
    let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
    let (_, fields) =
        fields(line).map_err(|e| format_err!("bad listing line {}: {}", line, e))?;
    if fields.len() < 5 {
        bail!(
            "bad listing line {}: expected at least 5 fields, got {}",
            line,
            fields.len()
        );
    }

    let name = fields[0].trim();
    let version = fields[2].trim();
    let release = fields[3].trim();
    let arch = fields[4].trim();
    if name.is_empty() {
        bail!("bad listing line {}: NAME missing", line);
    }
    if version.is_empty() {
        bail!("bad listing for {}: VERSION missing", name);
    }
    if arch.is_empty() {
        bail!("bad listing for {}: ARCH missing", name);
    }
    let epoch = parse_epoch(name, fields[1])?;

    let mut provides = Vec::new();
    for provide in &fields[5..] {
        let provide = provide.trim();
        if provide.is_empty() {
            continue;
        }
        match Capability::try_from(provide) {
            Ok(cap) => provides.push(cap),
            Err(e) => debug!("Ignoring provide {} of {}: {}", provide, name, e),
        }
    }

    Ok(PkgMeta {
        name: name.to_owned(),
        evr: Evr::new(epoch, version, release),
        arch: arch.to_owned(),
        provides,
    })
}
