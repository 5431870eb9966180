//! Index selections over tabular data.
//!
//! A [`Range1D`] selects indices of one dimension, a [`Range`] combines one per dimension
//! (rows first, then columns) and a [`ResolvedRange`] holds the concrete indices once a
//! range has been applied to a source with known extents.
//!
//! ```
//! use tabula_range::{Range, Range1D};
//!
//! let range: Range = "(4,2,6),:2".parse()?;
//! assert_eq!(range.component(0), Some(&Range1D::from_list(vec![4, 2, 6])));
//! assert_eq!(range.resolve(&[14, 12])?.shape(), vec![3, 2]);
//! # Ok::<(), tabula_range::RangeError>(())
//! ```

pub mod error;
pub mod parse;
pub mod range;
pub mod range1d;
pub mod resolved;

pub use error::RangeError;
pub use range::{join, Range};
pub use range1d::{Range1D, Range1DIter};
pub use resolved::ResolvedRange;
