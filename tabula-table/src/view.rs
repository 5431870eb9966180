use std::sync::Arc;

use async_trait::async_trait;
use tabula_range::{Range, ResolvedRange};

use crate::{error::TableError, source::DataSource, value::Value};

/// A lazy selection of a [`DataSource`].
///
/// A view only stores its source and range. Its extents are derived from the source on
/// every call, and data is fetched from the source only when asked for. A view is itself a
/// `DataSource`, so a view of a view composes the two selections into a single set of
/// indices of the underlying source.
#[derive(Debug)]
pub struct View<S: DataSource> {
    source: Arc<S>,
    range: Range,
}

impl<S: DataSource> Clone for View<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            range: self.range.clone(),
        }
    }
}

impl<S: DataSource> View<S> {
    pub fn new(source: Arc<S>, range: Range) -> Self {
        Self { source, range }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    /// Indices of the underlying source selected by this view
    pub fn resolved(&self) -> Result<ResolvedRange, TableError> {
        Ok(self.range.resolve(&self.source.dim()?)?)
    }

    /// Everything this view selects
    pub async fn data(&self) -> Result<S::Data, TableError> {
        let resolved = self.resolved()?;
        self.source.materialize(&resolved).await
    }

    /// The part of this view selected by `sub`, which is expressed in the view's coordinates
    pub async fn data_in(&self, sub: &Range) -> Result<S::Data, TableError> {
        let resolved = self.resolved()?.compose(sub)?;
        log::trace!("view `{}` then `{sub}` selects {:?}", self.range, resolved.shape());
        self.source.materialize(&resolved).await
    }
}

#[async_trait]
impl<S: DataSource> DataSource for View<S> {
    type Data = S::Data;

    fn dim(&self) -> Result<Vec<usize>, TableError> {
        Ok(self.resolved()?.shape())
    }

    async fn materialize(&self, resolved: &ResolvedRange) -> Result<Self::Data, TableError> {
        let resolved = self.resolved()?.select(resolved)?;
        self.source.materialize(&resolved).await
    }

    async fn at(&self, position: &[usize]) -> Result<Value, TableError> {
        let position = self.resolved()?.position(position)?;
        self.source.at(&position).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{
        tests::{Broken, Grid},
        DataSourceExt,
    };
    use tabula_range::{join, Range1D, RangeError};

    #[tokio::test]
    async fn test_view_dims() {
        let grid = Arc::new(Grid::new(12, 14));
        let view = grid.clone().view(join([Range1D::all(), Range1D::from(0..5)]));
        assert_eq!(view.dim().unwrap(), vec![12, 5]);

        let view = grid
            .clone()
            .view(join([Range1D::from_list(vec![4, 2, 6]), Range1D::all()]));
        assert_eq!(view.dim().unwrap(), vec![3, 14]);

        let view = grid.view(join([Range1D::from_list(vec![4, 2, 6]), Range1D::from(0..2)]));
        assert_eq!(view.dim().unwrap(), vec![3, 2]);
        assert_eq!(
            view.data().await.unwrap(),
            vec![vec![400, 401], vec![200, 201], vec![600, 601]]
        );
    }

    #[tokio::test]
    async fn test_view_of_view() {
        let grid = Arc::new(Grid::new(12, 14));
        let outer = Arc::new(
            grid.view(join([Range1D::from_list(vec![4, 2, 6, 8]), Range1D::from(3..)])),
        );
        let inner = outer.clone().view(join([
            Range1D::from_bounds(None, None, -2).unwrap(),
            Range1D::from_list(vec![0, 10]),
        ]));
        assert_eq!(inner.dim().unwrap(), vec![2, 2]);
        assert_eq!(
            inner.data().await.unwrap(),
            vec![vec![803, 813], vec![203, 213]]
        );
        assert_eq!(
            outer
                .data_in(&join([
                    Range1D::from_bounds(None, None, -2).unwrap(),
                    Range1D::from_list(vec![0, 10]),
                ]))
                .await
                .unwrap(),
            inner.data().await.unwrap()
        );
        assert_eq!(inner.at(&[1, 1]).await.unwrap(), Value::Int(213));
    }

    #[tokio::test]
    async fn test_out_of_range_is_not_clamped() {
        let grid = Arc::new(Grid::new(5, 2));
        let view = grid.view(Range::from(Range1D::from_list(vec![1, 7])));
        assert!(matches!(
            view.dim(),
            Err(TableError::Range(RangeError::OutOfRange { index: 7, size: 5 }))
        ));
        assert!(view.data().await.is_err());
    }

    #[tokio::test]
    async fn test_dim_tracks_source() {
        let grid = Arc::new(Grid::new(3, 2));
        let view = grid.clone().view(Range1D::from(1..));
        assert_eq!(view.dim().unwrap(), vec![2, 2]);

        grid.set_rows(6);
        assert_eq!(view.dim().unwrap(), vec![5, 2]);
        assert_eq!(view.data().await.unwrap().len(), 5);

        let pinned = grid.clone().view(Range1D::from_list(vec![4]));
        assert_eq!(pinned.dim().unwrap(), vec![1, 2]);
        grid.set_rows(2);
        assert!(matches!(
            pinned.dim(),
            Err(TableError::Range(RangeError::OutOfRange { index: 4, size: 2 }))
        ));
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let source = Arc::new(Broken);
        let view = Arc::new(source.view(join([Range1D::from(1..), Range1D::from_list(vec![2])])));
        assert_eq!(view.dim().unwrap(), vec![3, 1]);
        assert!(matches!(view.data().await, Err(TableError::SourceFailure(_))));
        assert!(matches!(
            view.data_in(&Range::from(Range1D::from_list(vec![0]))).await,
            Err(TableError::SourceFailure(_))
        ));
        assert!(matches!(view.at(&[0, 0]).await, Err(TableError::SourceFailure(_))));

        let inner = view.clone().view(Range::from(Range1D::from(0..2)));
        assert_eq!(inner.dim().unwrap(), vec![2, 1]);
        assert!(matches!(inner.data().await, Err(TableError::SourceFailure(_))));
        assert!(matches!(
            DataSource::data(&inner, &Range::all()).await,
            Err(TableError::SourceFailure(_))
        ));
    }
}
