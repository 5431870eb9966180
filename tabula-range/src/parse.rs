//! Compact text form of ranges.
//!
//! | Text        | Range1D                                |
//! |-------------|----------------------------------------|
//! | `` or `:`   | [`Range1D::All`]                       |
//! | `3:11:2`    | [`Range1D::Bounds`], any part optional |
//! | `5`         | [`Range1D::single`], a one-index list  |
//! | `(4,2,6)`   | [`Range1D::List`]                      |
//!
//! A multi-dimensional [`Range`] joins its components with commas, e.g. `(4,2,6),0:2`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::{error::RangeError, range::Range, range1d::Range1D};

impl Display for Range1D {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Range1D::All => write!(f, ":"),
            Range1D::Bounds { from, to, step } => {
                if let Some(from) = from {
                    write!(f, "{from}")?;
                }
                write!(f, ":")?;
                if let Some(to) = to {
                    write!(f, "{to}")?;
                }
                if *step != 1 {
                    write!(f, ":{step}")?;
                }
                Ok(())
            }
            Range1D::List(indices) if indices.len() == 1 => write!(f, "{}", indices[0]),
            Range1D::List(indices) => {
                write!(f, "(")?;
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{index}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, dim) in self.dims().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{dim}")?;
        }
        Ok(())
    }
}

fn parse_bound(part: &str, text: &str) -> Result<Option<i64>, RangeError> {
    let part = part.trim();
    if part.is_empty() {
        return Ok(None);
    }
    part.parse::<i64>()
        .map(Some)
        .map_err(|_| RangeError::malformed(format!("invalid bound `{part}` in `{text}`")))
}

impl FromStr for Range1D {
    type Err = RangeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let s = text.trim();
        if s.is_empty() || s == ":" {
            return Ok(Range1D::All);
        }

        if let Some(inner) = s.strip_prefix('(') {
            let inner = inner
                .strip_suffix(')')
                .ok_or_else(|| RangeError::malformed(format!("unclosed list in `{text}`")))?;
            if inner.trim().is_empty() {
                return Ok(Range1D::List(Vec::new()));
            }
            let indices = inner
                .split(',')
                .map(|part| {
                    let part = part.trim();
                    part.parse::<usize>().map_err(|_| {
                        RangeError::malformed(format!("invalid index `{part}` in `{text}`"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Range1D::List(indices));
        }

        if s.contains(':') {
            let parts: Vec<&str> = s.split(':').collect();
            if parts.len() > 3 {
                return Err(RangeError::malformed(format!(
                    "expected at most `from:to:step` but got `{text}`"
                )));
            }
            let from = parse_bound(parts[0], text)?;
            let to = parse_bound(parts[1], text)?;
            let step = match parts.get(2) {
                Some(part) => parse_bound(part, text)?.unwrap_or(1),
                None => 1,
            };
            return Range1D::from_bounds(from, to, step);
        }

        s.parse::<usize>()
            .map(Range1D::single)
            .map_err(|_| RangeError::malformed(format!("invalid index `{s}`")))
    }
}

/// Split on commas that are not nested inside a list
fn split_top_level(s: &str) -> Result<Vec<&str>, RangeError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| RangeError::malformed(format!("unbalanced `)` in `{s}`")))?;
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(RangeError::malformed(format!("unclosed list in `{s}`")));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.trim().is_empty() {
            return Ok(Range::all());
        }
        split_top_level(text)?
            .into_iter()
            .map(Range1D::from_str)
            .collect()
    }
}
