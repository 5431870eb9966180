use serde::{Deserialize, Serialize};

use crate::{error::RangeError, range::Range, range1d::Range1D};

/// The concrete indices selected by a [`Range`] in a source of known extents.
///
/// There is one index list per source dimension. The shape of the selection is the
/// length of each list, which is what a view over the source reports as its `dim`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedRange {
    dims: Vec<Vec<usize>>,
}

impl ResolvedRange {
    pub fn new(dims: Vec<Vec<usize>>) -> Self {
        Self { dims }
    }

    /// Every index of a source with the given extents
    pub fn full(extents: &[usize]) -> Self {
        Self {
            dims: extents.iter().map(|&len| (0..len).collect()).collect(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Number of selected indices per dimension
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(Vec::len).collect()
    }

    /// Selected indices of dimension `i`, empty for a dimension that does not exist
    pub fn dim(&self, i: usize) -> &[usize] {
        self.dims.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dims(&self) -> &[Vec<usize>] {
        &self.dims
    }

    pub fn into_dims(self) -> Vec<Vec<usize>> {
        self.dims
    }

    /// Total number of selected cells
    pub fn len(&self) -> usize {
        if self.dims.is_empty() {
            return 0;
        }
        self.dims.iter().map(Vec::len).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map a position expressed in this selection's coordinates to the source's coordinates
    pub fn position(&self, position: &[usize]) -> Result<Vec<usize>, RangeError> {
        if position.len() != self.dims.len() {
            return Err(RangeError::malformed(format!(
                "position {position:?} has {} dimensions but the selection has {}",
                position.len(),
                self.dims.len()
            )));
        }
        position
            .iter()
            .zip(&self.dims)
            .map(|(&p, indices)| {
                indices.get(p).copied().ok_or(RangeError::OutOfRange {
                    index: p,
                    size: indices.len(),
                })
            })
            .collect()
    }

    /// Pick positions of this selection, as given by `sub`, and return the source indices
    /// they refer to.
    ///
    /// `sub` is expressed in this selection's coordinates, so this composes two selections
    /// without touching any data.
    pub fn select(&self, sub: &ResolvedRange) -> Result<ResolvedRange, RangeError> {
        if sub.ndim() != self.ndim() {
            return Err(RangeError::malformed(format!(
                "cannot select {} dimensions from a {} dimensional selection",
                sub.ndim(),
                self.ndim()
            )));
        }
        let dims = self
            .dims
            .iter()
            .zip(&sub.dims)
            .map(|(outer, inner)| {
                inner
                    .iter()
                    .map(|&p| {
                        outer.get(p).copied().ok_or(RangeError::OutOfRange {
                            index: p,
                            size: outer.len(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedRange { dims })
    }

    /// Resolve `sub` against the shape of this selection, then map it back onto the source
    pub fn compose(&self, sub: &Range) -> Result<ResolvedRange, RangeError> {
        if sub.is_all() && sub.ndim() <= self.ndim() {
            return Ok(self.clone());
        }
        let inner = sub.resolve(&self.shape())?;
        self.select(&inner)
    }

    /// An equivalent [`Range`] made of explicit index lists
    pub fn to_range(&self) -> Range {
        self.dims
            .iter()
            .map(|indices| Range1D::from_list(indices.clone()))
            .collect()
    }
}
