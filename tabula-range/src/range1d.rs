use std::iter::FusedIterator;
use std::ops::{RangeFrom, RangeFull, RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// A selection over the indices of a single dimension.
///
/// A `Range1D` is one of three modes:
///
/// - [`Range1D::All`] selects every index of the dimension, in order.
/// - [`Range1D::Bounds`] selects `from`, `from + step`, ... while the index stays
///   strictly before `to` (in the direction of `step`). Negative bounds count from
///   the end of the dimension, and bounds past either end are clamped to it.
/// - [`Range1D::List`] selects the given indices verbatim. Order and duplicates are
///   preserved, and an index past the end of the dimension is an error rather than
///   being dropped.
///
/// A `Range1D` carries no knowledge of the dimension it will be applied to. The
/// concrete indices are only known once it is resolved against a length with
/// [`Range1D::indices`] or [`Range1D::iter`].
///
/// # Example
/// ```
/// use tabula_range::Range1D;
///
/// let stepped = Range1D::from_bounds(Some(3), Some(11), 2)?;
/// assert_eq!(stepped.indices(14)?, vec![3, 5, 7, 9]);
///
/// let backwards = Range1D::from_bounds(Some(11), Some(2), -1)?;
/// assert_eq!(backwards.indices(14)?, vec![11, 10, 9, 8, 7, 6, 5, 4, 3]);
///
/// let listed = Range1D::from_list(vec![2, 5, 1, 13]);
/// assert_eq!(listed.indices(14)?, vec![2, 5, 1, 13]);
/// # Ok::<(), tabula_range::RangeError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Range1D {
    #[default]
    All,
    Bounds {
        from: Option<i64>,
        to: Option<i64>,
        step: i64,
    },
    List(Vec<usize>),
}

impl Range1D {
    /// Select every index of the dimension
    pub fn all() -> Self {
        Self::All
    }

    /// Build a stepped range.
    ///
    /// `from` defaults to the first index in the direction of `step` (0 for a positive
    /// step, the last index for a negative one) and `to` defaults to running off the end.
    /// Returns [`RangeError::MalformedRange`] if `step` is zero.
    pub fn from_bounds(from: Option<i64>, to: Option<i64>, step: i64) -> Result<Self, RangeError> {
        if step == 0 {
            return Err(RangeError::malformed("step must not be zero"));
        }
        if from.is_none() && to.is_none() && step == 1 {
            return Ok(Self::All);
        }
        Ok(Self::Bounds { from, to, step })
    }

    /// Select an explicit list of indices
    pub fn from_list(indices: impl Into<Vec<usize>>) -> Self {
        Self::List(indices.into())
    }

    /// Select exactly one index. Like a list, an index past the end is
    /// [`RangeError::OutOfRange`] when resolved.
    pub fn single(index: usize) -> Self {
        Self::List(vec![index])
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Number of indices this range selects in a dimension of length `len`
    pub fn size(&self, len: usize) -> Result<usize, RangeError> {
        Ok(self.iter(len)?.len())
    }

    /// Resolve this range against a dimension of length `len`
    pub fn indices(&self, len: usize) -> Result<Vec<usize>, RangeError> {
        Ok(self.iter(len)?.collect())
    }

    /// Iterate the indices this range selects in a dimension of length `len`.
    ///
    /// Validation happens up front, so a returned iterator never yields an index
    /// outside `0..len`.
    pub fn iter(&self, len: usize) -> Result<Range1DIter<'_>, RangeError> {
        match self {
            Self::All => Ok(Range1DIter::Stepped {
                next: 0,
                step: 1,
                remaining: len,
            }),
            Self::Bounds { from, to, step } => {
                if *step == 0 {
                    return Err(RangeError::malformed("step must not be zero"));
                }
                let (start, stop) = normalize_bounds(*from, *to, *step, len);
                Ok(Range1DIter::Stepped {
                    next: start,
                    step: *step,
                    remaining: stepped_count(start, stop, *step),
                })
            }
            Self::List(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                    return Err(RangeError::OutOfRange { index, size: len });
                }
                Ok(Range1DIter::List(indices.iter()))
            }
        }
    }
}

/// Apply end-relative negative bounds and clamp both bounds into the dimension.
///
/// For a positive step the result lies in `[0, len]`, for a negative step in
/// `[-1, len - 1]`, where `-1` stands for "before the first index".
fn normalize_bounds(from: Option<i64>, to: Option<i64>, step: i64, len: usize) -> (i64, i64) {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let relative = |v: i64| if v < 0 { v + len } else { v };
    if step > 0 {
        let start = from.map_or(0, relative).clamp(0, len);
        let stop = to.map_or(len, relative).clamp(0, len);
        (start, stop)
    } else {
        let start = from.map_or(len - 1, relative).clamp(-1, len - 1);
        let stop = to.map_or(-1, relative).clamp(-1, len - 1);
        (start, stop)
    }
}

fn stepped_count(start: i64, stop: i64, step: i64) -> usize {
    let span = if step > 0 { stop - start } else { start - stop };
    if span <= 0 {
        return 0;
    }
    ((span as u64 - 1) / step.unsigned_abs() + 1) as usize
}

/// A `usize` bound as an `i64`, saturating so that huge bounds clamp to the end
fn bound(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Iterator over the resolved indices of a [`Range1D`]
#[derive(Debug, Clone)]
pub enum Range1DIter<'a> {
    Stepped { next: i64, step: i64, remaining: usize },
    List(std::slice::Iter<'a, usize>),
}

impl Iterator for Range1DIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Self::Stepped {
                next,
                step,
                remaining,
            } => {
                if *remaining == 0 {
                    return None;
                }
                let current = *next;
                *remaining -= 1;
                // Only step while another index remains, which is always in bounds
                if *remaining > 0 {
                    *next += *step;
                }
                Some(current as usize)
            }
            Self::List(iter) => iter.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match self {
            Self::Stepped { remaining, .. } => *remaining,
            Self::List(iter) => iter.len(),
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for Range1DIter<'_> {}

impl FusedIterator for Range1DIter<'_> {}

impl From<std::ops::Range<usize>> for Range1D {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::Bounds {
            from: Some(bound(r.start)),
            to: Some(bound(r.end)),
            step: 1,
        }
    }
}

impl From<RangeInclusive<usize>> for Range1D {
    fn from(r: RangeInclusive<usize>) -> Self {
        Self::Bounds {
            from: Some(bound(*r.start())),
            to: Some(bound(*r.end()).saturating_add(1)),
            step: 1,
        }
    }
}

impl From<RangeFrom<usize>> for Range1D {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::Bounds {
            from: Some(bound(r.start)),
            to: None,
            step: 1,
        }
    }
}

impl From<RangeFull> for Range1D {
    fn from(_: RangeFull) -> Self {
        Self::All
    }
}

impl From<Vec<usize>> for Range1D {
    fn from(indices: Vec<usize>) -> Self {
        Self::List(indices)
    }
}

impl From<&[usize]> for Range1D {
    fn from(indices: &[usize]) -> Self {
        Self::List(indices.to_vec())
    }
}
