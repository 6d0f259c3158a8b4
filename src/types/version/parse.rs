use super::Evr;

use anyhow::{format_err, Result};
use nom::{
    character::complete::{char, digit1},
    sequence::terminated,
    IResult,
};

fn epoch(i: &str) -> IResult<&str, &str> {
    terminated(digit1, char(':'))(i)
}

/// Split `[epoch:]version[-release]`.
///
/// The release starts after the last `-`, so versions may contain dashes themselves.
pub fn parse_evr(i: &str) -> Result<Evr> {
    let i = i.trim();
    let (rest, epoch) = match epoch(i) {
        Ok((rest, epoch)) => {
            let epoch = epoch
                .parse()
                .map_err(|e| format_err!("Malformed epoch in {}: {}", i, e))?;
            (rest, Some(epoch))
        }
        Err(_) => (i, None),
    };

    let (version, release) = rest.rsplit_once('-').unwrap_or((rest, ""));

    Ok(Evr::new(epoch, version, release))
}

impl TryFrom<&str> for Evr {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self> {
        parse_evr(s)
    }
}
