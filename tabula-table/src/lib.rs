//! Arrow backed tables and vectors with lazy, composable views.
//!
//! Tables are built through a [`TabulaContext`], which registers their row names with an
//! [`IdType`]. Any [`DataSource`] can be sliced with a [`tabula_range::Range`] into a
//! [`View`] without copying data. Data is only gathered when a view's `data` is awaited.

pub mod context;
pub mod desc;
pub mod error;
pub mod idtype;
pub mod source;
pub mod stats;
pub mod table;
pub mod value;
pub mod vector;
pub mod view;

pub use context::{TabulaConfig, TabulaContext};
pub use desc::{Category, ColumnDesc, TableDesc, ValueType};
pub use error::{TableError, UnresolvedIdentifier};
pub use idtype::IdType;
pub use source::{DataSource, DataSourceExt};
pub use stats::{Histogram, Statistics};
pub use table::{RowObject, Table};
pub use value::Value;
pub use vector::Vector;
pub use view::View;
