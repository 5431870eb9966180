use serde::{Deserialize, Serialize};

use crate::{error::RangeError, range1d::Range1D, resolved::ResolvedRange};

/// A rectangular selection over a multi-dimensional source, one [`Range1D`] per dimension.
///
/// Dimension 0 is always rows and dimension 1 is always columns. A range may list fewer
/// components than the source it is applied to; every missing trailing dimension is
/// treated as [`Range1D::All`]. So `Range::from(Range1D::from_list(vec![0, 1]))` applied
/// to a table selects rows 0 and 1 with all columns.
///
/// Building a range never validates it. Validation happens when the range is resolved
/// against the extents of a concrete source, see [`Range::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    dims: Vec<Range1D>,
}

impl Range {
    pub fn new(dims: Vec<Range1D>) -> Self {
        Self { dims }
    }

    /// A range selecting everything, in any number of dimensions
    pub fn all() -> Self {
        Self { dims: Vec::new() }
    }

    /// Number of explicitly given components
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[Range1D] {
        &self.dims
    }

    /// The explicitly given component for dimension `i`, if any
    pub fn component(&self, i: usize) -> Option<&Range1D> {
        self.dims.get(i)
    }

    /// The effective component for dimension `i`, which is all when not given
    pub fn dim(&self, i: usize) -> Range1D {
        self.dims.get(i).cloned().unwrap_or_default()
    }

    pub fn is_all(&self) -> bool {
        self.dims.iter().all(Range1D::is_all)
    }

    /// Append the dimensions of `other` after the dimensions of this range
    pub fn join(mut self, other: Range) -> Range {
        self.dims.extend(other.dims);
        self
    }

    /// Reverse the order of the dimensions, turning a rows x columns range into
    /// a columns x rows range
    pub fn swap(&self) -> Range {
        Range {
            dims: self.dims.iter().rev().cloned().collect(),
        }
    }

    /// Resolve every dimension against `extents`.
    ///
    /// The result always has one index list per extent. Returns
    /// [`RangeError::MalformedRange`] when the range has more components than there are
    /// extents and [`RangeError::OutOfRange`] when a listed index does not exist.
    pub fn resolve(&self, extents: &[usize]) -> Result<ResolvedRange, RangeError> {
        if self.dims.len() > extents.len() {
            return Err(RangeError::malformed(format!(
                "range `{}` has {} dimensions but the source has {}",
                self,
                self.dims.len(),
                extents.len()
            )));
        }
        let dims = extents
            .iter()
            .enumerate()
            .map(|(i, &len)| match self.dims.get(i) {
                Some(component) => component.indices(len),
                None => Range1D::All.indices(len),
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::trace!("resolved range `{self}` against {extents:?}");
        Ok(ResolvedRange::new(dims))
    }

    /// Per-dimension cardinalities of this range against `extents`
    pub fn size(&self, extents: &[usize]) -> Result<Vec<usize>, RangeError> {
        if self.dims.len() > extents.len() {
            return Err(RangeError::malformed(format!(
                "range `{}` has {} dimensions but the source has {}",
                self,
                self.dims.len(),
                extents.len()
            )));
        }
        extents
            .iter()
            .enumerate()
            .map(|(i, &len)| self.dim(i).size(len))
            .collect()
    }
}

/// Combine per-dimension selections into a multi-dimensional [`Range`].
///
/// The `i`-th component of the result is the `i`-th argument, unchanged. No validation is
/// performed here, mismatches only surface once the range is resolved against a source.
///
/// ```
/// use tabula_range::{join, Range1D};
///
/// let rows = Range1D::from_list(vec![4, 2, 6]);
/// let cols = Range1D::all();
/// let range = join([rows.clone(), cols.clone()]);
/// assert_eq!(range.component(0), Some(&rows));
/// assert_eq!(range.component(1), Some(&cols));
/// assert_eq!(range.resolve(&[14, 12])?.shape(), vec![3, 12]);
/// # Ok::<(), tabula_range::RangeError>(())
/// ```
pub fn join<I>(dims: I) -> Range
where
    I: IntoIterator<Item = Range1D>,
{
    Range::new(dims.into_iter().collect())
}

impl From<Range1D> for Range {
    fn from(dim: Range1D) -> Self {
        Self { dims: vec![dim] }
    }
}

impl From<(Range1D, Range1D)> for Range {
    fn from((rows, cols): (Range1D, Range1D)) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }
}

impl FromIterator<Range1D> for Range {
    fn from_iter<T: IntoIterator<Item = Range1D>>(iter: T) -> Self {
        join(iter)
    }
}
