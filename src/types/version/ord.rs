use super::Evr;

use nom::character::complete::{alpha1, digit1};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment<'a> {
    // Sorts before everything, even the end of the string
    Tilde,
    // Sorts after the end of the string, but before anything else
    Caret,
    // Leading zeros already stripped
    Number(&'a str),
    Alphabetic(&'a str),
}

fn is_separator(c: char) -> bool {
    !c.is_ascii_alphanumeric() && c != '~' && c != '^'
}

fn segments(mut i: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    loop {
        // Separators only delimit segments, they never take part in the comparison
        i = i.trim_start_matches(is_separator);
        if i.is_empty() {
            break;
        } else if let Some(rest) = i.strip_prefix('~') {
            result.push(Segment::Tilde);
            i = rest;
        } else if let Some(rest) = i.strip_prefix('^') {
            result.push(Segment::Caret);
            i = rest;
        } else if let Ok((rest, digits)) = digit1::<_, ()>(i) {
            result.push(Segment::Number(digits.trim_start_matches('0')));
            i = rest;
        } else if let Ok((rest, chars)) = alpha1::<_, ()>(i) {
            result.push(Segment::Alphabetic(chars));
            i = rest;
        } else {
            break;
        }
    }

    result
}

/// The rpmvercmp algorithm, including `~` (pre-release) and `^` (post-release)
/// Check https://fedoraproject.org/wiki/Archive:Tools/RPM/VersionComparison
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    use Segment::*;

    if a == b {
        return Ordering::Equal;
    }

    let this_segments = segments(a);
    let that_segments = segments(b);
    let mut pos = 0;
    loop {
        match (this_segments.get(pos), that_segments.get(pos)) {
            (None, None) => return Ordering::Equal,
            (Some(Tilde), Some(Tilde)) | (Some(Caret), Some(Caret)) => (),
            (Some(Tilde), _) => return Ordering::Less,
            (_, Some(Tilde)) => return Ordering::Greater,
            (Some(Caret), None) => return Ordering::Greater,
            (None, Some(Caret)) => return Ordering::Less,
            (Some(Caret), _) => return Ordering::Less,
            (_, Some(Caret)) => return Ordering::Greater,
            // Whoever still has segments left wins
            (None, _) => return Ordering::Less,
            (_, None) => return Ordering::Greater,
            // Numbers are always newer than letters
            (Some(Number(_)), Some(Alphabetic(_))) => return Ordering::Greater,
            (Some(Alphabetic(_)), Some(Number(_))) => return Ordering::Less,
            (Some(Number(this)), Some(Number(that))) => {
                let res = this.len().cmp(&that.len()).then_with(|| this.cmp(that));
                if res != Ordering::Equal {
                    return res;
                }
            }
            (Some(Alphabetic(this)), Some(Alphabetic(that))) => {
                let res = this.cmp(that);
                if res != Ordering::Equal {
                    return res;
                }
            }
        }
        pos += 1;
    }
}

impl Evr {
    /// Compare the way a dependency range check does: a release only counts if both
    /// sides carry one.
    pub fn cmp_for_match(&self, other: &Evr) -> Ordering {
        let res = self
            .epoch
            .unwrap_or(0)
            .cmp(&other.epoch.unwrap_or(0))
            .then_with(|| rpmvercmp(&self.version, &other.version));
        if res == Ordering::Equal && !self.release.is_empty() && !other.release.is_empty() {
            rpmvercmp(&self.release, &other.release)
        } else {
            res
        }
    }
}

impl Ord for Evr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .unwrap_or(0)
            .cmp(&other.epoch.unwrap_or(0))
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| rpmvercmp(&self.release, &other.release))
    }
}

impl PartialOrd for Evr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evr {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Evr {}
