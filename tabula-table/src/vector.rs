use std::sync::{Arc, OnceLock};

use arrow::array::{Array, ArrayRef, UInt64Array};
use arrow::compute::take;
use arrow::error::ArrowError;
use async_trait::async_trait;
use tabula_range::{Range1D, RangeError, ResolvedRange};

use crate::{
    desc::{ColumnDesc, ValueType},
    error::{DuplicateResult, TableError},
    idtype::IdType,
    source::DataSource,
    stats::{compute_histogram, compute_statistics, Histogram, Statistics},
    value::Value,
    view::View,
};

/// Gather `rows` of `array` into a new array
pub(crate) fn take_rows(array: &dyn Array, rows: &[usize]) -> Result<ArrayRef, ArrowError> {
    let indices = UInt64Array::from_iter_values(rows.iter().map(|&r| r as u64));
    take(array, &indices, None)
}

/// Values at `rows`, which are already validated against `values`
pub(crate) fn select_rows<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().filter_map(|&r| values.get(r).cloned()).collect()
}

/// A single named column, with the row names and ids of the table it belongs to.
#[derive(Debug)]
pub struct Vector {
    desc: ColumnDesc,
    array: ArrayRef,
    row_names: Arc<Vec<String>>,
    row_ids: Arc<Vec<usize>>,
    idtype: Arc<IdType>,
    hist_bins: Option<usize>,
    stats: OnceLock<Result<Statistics, TableError>>,
}

impl Vector {
    pub(crate) fn new(
        desc: ColumnDesc,
        array: ArrayRef,
        row_names: Arc<Vec<String>>,
        row_ids: Arc<Vec<usize>>,
        idtype: Arc<IdType>,
        hist_bins: Option<usize>,
    ) -> Self {
        Self {
            desc,
            array,
            row_names,
            row_ids,
            idtype,
            hist_bins,
            stats: OnceLock::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn desc(&self) -> &ColumnDesc {
        &self.desc
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn value_type(&self) -> &ValueType {
        &self.desc.value_type
    }

    pub fn idtype(&self) -> &Arc<IdType> {
        &self.idtype
    }

    /// The whole column
    pub fn array(&self) -> &ArrayRef {
        &self.array
    }

    pub async fn at(&self, index: usize) -> Result<Value, TableError> {
        DataSource::at(self, &[index]).await
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    /// Names of the selected rows
    pub fn rows(&self, rows: &Range1D) -> Result<Vec<String>, TableError> {
        Ok(select_rows(&self.row_names, &rows.indices(self.len())?))
    }

    pub fn row_ids(&self) -> Range1D {
        Range1D::from_list(self.row_ids.to_vec())
    }

    /// Statistics of the whole column, computed once
    pub fn stats(&self) -> Result<Statistics, TableError> {
        self.stats
            .get_or_init(|| {
                log::debug!("computing statistics of `{}`", self.desc.name);
                compute_statistics(&self.desc.name, self.array.as_ref())
            })
            .duplicate()
    }

    pub fn hist(&self, bins: Option<usize>) -> Result<Histogram, TableError> {
        compute_histogram(&self.desc, self.array.as_ref(), bins.or(self.hist_bins))
    }
}

#[async_trait]
impl DataSource for Vector {
    type Data = ArrayRef;

    fn dim(&self) -> Result<Vec<usize>, TableError> {
        Ok(vec![self.len()])
    }

    async fn materialize(&self, resolved: &ResolvedRange) -> Result<ArrayRef, TableError> {
        Ok(take_rows(self.array.as_ref(), resolved.dim(0))?)
    }

    async fn at(&self, position: &[usize]) -> Result<Value, TableError> {
        let [index] = position else {
            return Err(RangeError::MalformedRange(format!(
                "expected a single index into vector `{}`, got {position:?}",
                self.desc.name
            ))
            .into());
        };
        Value::from_array(self.array.as_ref(), *index)
    }
}

impl View<Vector> {
    pub async fn stats(&self) -> Result<Statistics, TableError> {
        let data = self.data().await?;
        compute_statistics(self.source().name(), data.as_ref())
    }

    pub async fn hist(&self, bins: Option<usize>) -> Result<Histogram, TableError> {
        let data = self.data().await?;
        compute_histogram(
            self.source().desc(),
            data.as_ref(),
            bins.or(self.source().hist_bins),
        )
    }

    pub fn row_names(&self) -> Result<Vec<String>, TableError> {
        Ok(select_rows(self.source().row_names(), self.resolved()?.dim(0)))
    }

    pub fn row_ids(&self) -> Result<Range1D, TableError> {
        Ok(Range1D::from_list(select_rows(
            &self.source().row_ids,
            self.resolved()?.dim(0),
        )))
    }
}
