use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use tabula_range::{Range, ResolvedRange};

use crate::{error::TableError, value::Value, view::View};

/// Something that holds multi-dimensional data addressable by [`Range`]s.
///
/// Implementors report their extents with `dim` and produce data for a fully resolved
/// selection with `materialize`. Resolution and validation of ranges is shared through the
/// provided methods, so sources never see a range that does not fit them.
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Materialized form of a selection, e.g. a `RecordBatch` for tables
    type Data: Send;

    /// Extent of every dimension, rows first
    fn dim(&self) -> Result<Vec<usize>, TableError>;

    /// Produce the data of an already validated selection
    async fn materialize(&self, resolved: &ResolvedRange) -> Result<Self::Data, TableError>;

    /// Value of a single cell
    async fn at(&self, position: &[usize]) -> Result<Value, TableError>;

    fn resolve(&self, range: &Range) -> Result<ResolvedRange, TableError> {
        Ok(range.resolve(&self.dim()?)?)
    }

    async fn data(&self, range: &Range) -> Result<Self::Data, TableError> {
        let resolved = self.resolve(range)?;
        self.materialize(&resolved).await
    }
}

pub trait DataSourceExt: DataSource + Sized {
    /// A lazy view of the selected part of this source
    fn view(self: Arc<Self>, range: impl Into<Range>) -> View<Self> {
        View::new(self, range.into())
    }
}

impl<S: DataSource> DataSourceExt for S {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use arrow::error::ArrowError;
    use tabula_range::Range1D;

    /// Grid where each cell holds `row * 100 + col`. The row count can change after
    /// views have been taken.
    #[derive(Debug)]
    pub(crate) struct Grid {
        rows: AtomicUsize,
        cols: usize,
    }

    impl Grid {
        pub(crate) fn new(rows: usize, cols: usize) -> Self {
            Self {
                rows: AtomicUsize::new(rows),
                cols,
            }
        }

        pub(crate) fn set_rows(&self, rows: usize) {
            self.rows.store(rows, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DataSource for Grid {
        type Data = Vec<Vec<i64>>;

        fn dim(&self) -> Result<Vec<usize>, TableError> {
            Ok(vec![self.rows.load(Ordering::SeqCst), self.cols])
        }

        async fn materialize(&self, resolved: &ResolvedRange) -> Result<Self::Data, TableError> {
            Ok(resolved
                .dim(0)
                .iter()
                .map(|&r| resolved.dim(1).iter().map(|&c| (r * 100 + c) as i64).collect())
                .collect())
        }

        async fn at(&self, position: &[usize]) -> Result<Value, TableError> {
            let resolved = self.resolve(&Range::new(
                position.iter().map(|&i| Range1D::from_list(vec![i])).collect(),
            ))?;
            Ok(Value::Int((resolved.dim(0)[0] * 100 + resolved.dim(1)[0]) as i64))
        }
    }

    /// A source whose reads always fail
    #[derive(Debug)]
    pub(crate) struct Broken;

    #[async_trait]
    impl DataSource for Broken {
        type Data = Vec<Vec<i64>>;

        fn dim(&self) -> Result<Vec<usize>, TableError> {
            Ok(vec![4, 3])
        }

        async fn materialize(&self, _resolved: &ResolvedRange) -> Result<Self::Data, TableError> {
            Err(ArrowError::ComputeError("read failed".to_string()).into())
        }

        async fn at(&self, _position: &[usize]) -> Result<Value, TableError> {
            Err(ArrowError::ComputeError("read failed".to_string()).into())
        }
    }

    #[tokio::test]
    async fn test_provided_data() {
        let grid = Grid::new(4, 3);
        let data = grid
            .data(&Range::from((Range1D::from_list(vec![3, 0]), Range1D::from(1..))))
            .await
            .unwrap();
        assert_eq!(data, vec![vec![301, 302], vec![1, 2]]);

        let err = grid
            .data(&Range::from(Range1D::from_list(vec![4])))
            .await
            .unwrap_err();
        assert!(matches!(err, TableError::Range(_)));
        assert_eq!(grid.at(&[2, 1]).await.unwrap(), Value::Int(201));
    }
}
