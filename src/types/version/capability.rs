use super::{parse::parse_evr, Evr};

use anyhow::{format_err, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::space0,
    combinator::{eof, opt, value},
    sequence::{pair, preceded},
    IResult,
};
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityOp {
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
}

impl CapabilityOp {
    fn has_less(self) -> bool {
        matches!(self, CapabilityOp::Less | CapabilityOp::LessEqual)
    }

    fn has_equal(self) -> bool {
        matches!(
            self,
            CapabilityOp::LessEqual | CapabilityOp::Equal | CapabilityOp::GreaterEqual
        )
    }

    fn has_greater(self) -> bool {
        matches!(self, CapabilityOp::Greater | CapabilityOp::GreaterEqual)
    }
}

impl fmt::Display for CapabilityOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = match self {
            CapabilityOp::Less => "<",
            CapabilityOp::LessEqual => "<=",
            CapabilityOp::Equal => "=",
            CapabilityOp::GreaterEqual => ">=",
            CapabilityOp::Greater => ">",
        };
        write!(f, "{}", op)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub op: CapabilityOp,
    pub evr: Evr,
}

impl Constraint {
    /// rpm range overlap: does any EVR satisfy both constraints?
    pub fn overlaps(&self, other: &Constraint) -> bool {
        match self.evr.cmp_for_match(&other.evr) {
            Ordering::Less => self.op.has_greater() || other.op.has_less(),
            Ordering::Greater => self.op.has_less() || other.op.has_greater(),
            Ordering::Equal => {
                (self.op.has_equal() && other.op.has_equal())
                    || (self.op.has_less() && other.op.has_less())
                    || (self.op.has_greater() && other.op.has_greater())
            }
        }
    }
}

/// A provided or requested capability: `name [op [epoch:]version[-release]]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capability {
    pub name: String,
    pub constraint: Option<Constraint>,
}

impl Capability {
    /// Check if a provide named `name` with `constraint` satisfies this capability.
    /// A missing constraint on either side matches every version.
    pub fn is_satisfied_by(&self, name: &str, constraint: Option<&Constraint>) -> bool {
        if self.name != name {
            return false;
        }
        match (&self.constraint, constraint) {
            (Some(this), Some(that)) => this.overlaps(that),
            _ => true,
        }
    }

    /// Check if this capability, as a provide, satisfies `other`
    pub fn satisfies(&self, other: &Capability) -> bool {
        other.is_satisfied_by(&self.name, self.constraint.as_ref())
    }
}

/// Whether a specifier is a versioned capability expression rather than a name
pub fn is_capability_expr(s: &str) -> bool {
    s.contains(|c: char| c == '<' || c == '=' || c == '>')
}

fn is_capability_name_char(c: char) -> bool {
    !c.is_whitespace() && c != '<' && c != '>' && c != '='
}

fn capability_op(i: &str) -> IResult<&str, CapabilityOp> {
    alt((
        value(CapabilityOp::GreaterEqual, tag(">=")),
        value(CapabilityOp::LessEqual, tag("<=")),
        value(CapabilityOp::Equal, tag("==")),
        value(CapabilityOp::Equal, tag("=")),
        value(CapabilityOp::Greater, tag(">")),
        value(CapabilityOp::Less, tag("<")),
    ))(i)
}

fn version_token(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(i)
}

/// Use `nom` to split a capability expression into name, operator and raw version
pub fn parse_capability(i: &str) -> IResult<&str, (&str, Option<(CapabilityOp, &str)>)> {
    let (i, _) = space0(i)?;
    let (i, name) = take_while1(is_capability_name_char)(i)?;
    let (i, _) = space0(i)?;
    let (i, constraint) = opt(pair(capability_op, preceded(space0, version_token)))(i)?;
    let (i, _) = space0(i)?;
    let (i, _) = eof(i)?;

    Ok((i, (name, constraint)))
}

impl TryFrom<&str> for Capability {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self> {
        let (_, (name, constraint)) =
            parse_capability(s).map_err(|e| format_err!("Malformed capability {}: {}", s, e))?;
        let constraint = match constraint {
            Some((op, evr)) => Some(Constraint {
                op,
                evr: parse_evr(evr)?,
            }),
            None => None,
        };

        Ok(Capability {
            name: name.to_owned(),
            constraint,
        })
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " {} {}", constraint.op, constraint.evr)?;
        }
        Ok(())
    }
}
