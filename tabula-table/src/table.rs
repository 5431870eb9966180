use std::{collections::HashMap, sync::Arc};

use arrow::array::{Array, ArrayRef, RecordBatch, RecordBatchOptions};
use arrow::compute::cast;
use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::json::{writer::JsonArray, WriterBuilder};
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use tabula_range::{Range, Range1D, RangeError, ResolvedRange};

use crate::{
    context::TabulaConfig,
    desc::{ColumnDesc, TableDesc},
    error::{TableError, UnresolvedIdentifier},
    idtype::IdType,
    source::{DataSource, DataSourceExt},
    value::Value,
    vector::{select_rows, take_rows, Vector},
    view::View,
};

/// One row as a JSON object keyed by column name
pub type RowObject = Map<String, JsonValue>;

/// A two-dimensional table of named, typed columns with named rows.
///
/// Rows are registered with the table's id type when the table is built, so every row
/// also has a system id that is stable across tables sharing the id type.
#[derive(Debug)]
pub struct Table {
    desc: TableDesc,
    batch: RecordBatch,
    row_names: Arc<Vec<String>>,
    row_ids: Arc<Vec<usize>>,
    id_rows: HashMap<usize, usize>,
    idtype: Arc<IdType>,
    hist_bins: Option<usize>,
}

impl Table {
    pub(crate) fn try_new(
        desc: TableDesc,
        batch: RecordBatch,
        row_names: Vec<String>,
        idtype: Arc<IdType>,
        config: &TabulaConfig,
    ) -> Result<Self, TableError> {
        if batch.num_columns() != desc.columns.len() {
            return Err(TableError::InvalidTable(format!(
                "table `{}` describes {} columns but has {}",
                desc.id,
                desc.columns.len(),
                batch.num_columns()
            )));
        }
        if row_names.len() != batch.num_rows() {
            return Err(TableError::InvalidTable(format!(
                "table `{}` has {} rows but {} row names",
                desc.id,
                batch.num_rows(),
                row_names.len()
            )));
        }

        let columns = desc
            .columns
            .iter()
            .zip(batch.columns())
            .map(|(column, array)| conform_column(column, array, config.strict_types))
            .collect::<Result<Vec<_>, _>>()?;
        let fields: Vec<Field> = desc
            .columns
            .iter()
            .map(|c| Field::new(&c.name, c.value_type.data_type(), true))
            .collect();
        let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)?;

        let row_ids = idtype.register(&row_names);
        let mut id_rows = HashMap::with_capacity(row_ids.len());
        for (row, &id) in row_ids.iter().enumerate() {
            id_rows.entry(id).or_insert(row);
        }
        log::debug!(
            "built table `{}` with {} rows and {} columns",
            desc.id,
            batch.num_rows(),
            batch.num_columns()
        );

        Ok(Self {
            desc,
            batch,
            row_names: Arc::new(row_names),
            row_ids: Arc::new(row_ids),
            id_rows,
            idtype,
            hist_bins: config.hist_bins,
        })
    }

    pub fn desc(&self) -> &TableDesc {
        &self.desc
    }

    pub fn idtype(&self) -> &Arc<IdType> {
        &self.idtype
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_cols(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn col(&self, i: usize) -> Result<Vector, TableError> {
        let (desc, array) = self
            .desc
            .columns
            .get(i)
            .zip(self.batch.columns().get(i))
            .ok_or(RangeError::OutOfRange {
                index: i,
                size: self.num_cols(),
            })?;
        Ok(Vector::new(
            desc.clone(),
            array.clone(),
            self.row_names.clone(),
            self.row_ids.clone(),
            self.idtype.clone(),
            self.hist_bins,
        ))
    }

    pub fn col_by_name(&self, name: &str) -> Result<Vector, TableError> {
        let i = self
            .desc
            .column_index(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;
        self.col(i)
    }

    pub fn cols(&self, cols: &Range1D) -> Result<Vec<Vector>, TableError> {
        cols.iter(self.num_cols())?.map(|i| self.col(i)).collect()
    }

    pub fn column_descs(&self) -> &[ColumnDesc] {
        &self.desc.columns
    }

    /// The whole column named `name`
    pub fn col_data(&self, name: &str) -> Result<ArrayRef, TableError> {
        let i = self
            .desc
            .column_index(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;
        Ok(self.batch.column(i).clone())
    }

    pub async fn at(&self, row: usize, col: usize) -> Result<Value, TableError> {
        DataSource::at(self, &[row, col]).await
    }

    /// Selected rows as JSON objects keyed by column name
    pub async fn objects(&self, range: &Range) -> Result<Vec<RowObject>, TableError> {
        let resolved = self.resolve(range)?;
        self.objects_of(&resolved).await
    }

    /// Row objects are keyed by column name, so a column may be selected only once
    async fn objects_of(&self, resolved: &ResolvedRange) -> Result<Vec<RowObject>, TableError> {
        let cols = resolved.dim(1);
        if let Some((i, &col)) = cols
            .iter()
            .enumerate()
            .find(|&(i, col)| cols[..i].contains(col))
        {
            return Err(RangeError::MalformedRange(format!(
                "column {col} of `{}` is selected again at position {i}, row objects need unique columns",
                self.desc.id
            ))
            .into());
        }
        let batch = self.materialize(resolved).await?;
        if batch.num_rows() == 0 {
            return Ok(Vec::new());
        }
        let mut writer = WriterBuilder::new()
            .with_explicit_nulls(true)
            .build::<_, JsonArray>(Vec::new());
        writer.write(&batch)?;
        writer.finish()?;
        Ok(serde_json::from_slice(&writer.into_inner())?)
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    /// Names of the selected rows
    pub fn rows(&self, rows: &Range1D) -> Result<Vec<String>, TableError> {
        Ok(select_rows(&self.row_names, &rows.indices(self.num_rows())?))
    }

    /// System ids of all rows, in row order
    pub fn row_ids(&self) -> Range1D {
        Range1D::from_list(self.row_ids.to_vec())
    }

    /// A view of the rows with the given system ids, in the order given
    pub fn id_view(self: Arc<Self>, ids: &[usize]) -> Result<View<Table>, TableError> {
        let rows = ids
            .iter()
            .map(|id| {
                self.id_rows.get(id).copied().ok_or_else(|| {
                    let name = self.idtype.name(*id).unwrap_or_else(|| format!("#{id}"));
                    UnresolvedIdentifier(name)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.view(Range1D::from_list(rows)))
    }
}

/// Check the storage type of a column, casting it when types are not strict
fn conform_column(
    column: &ColumnDesc,
    array: &ArrayRef,
    strict: bool,
) -> Result<ArrayRef, TableError> {
    let expected = column.value_type.data_type();
    if array.data_type() == &expected {
        return Ok(array.clone());
    }
    if strict {
        return Err(TableError::TypeMismatch {
            column: column.name.clone(),
            expected: expected.to_string(),
            actual: array.data_type().to_string(),
        });
    }
    log::debug!(
        "casting column `{}` from {} to {}",
        column.name,
        array.data_type(),
        expected
    );
    Ok(cast(array.as_ref(), &expected)?)
}

#[async_trait]
impl DataSource for Table {
    type Data = RecordBatch;

    fn dim(&self) -> Result<Vec<usize>, TableError> {
        Ok(vec![self.num_rows(), self.num_cols()])
    }

    async fn materialize(&self, resolved: &ResolvedRange) -> Result<RecordBatch, TableError> {
        let rows = resolved.dim(0);
        let cols = resolved.dim(1);
        log::trace!(
            "materializing {} rows and {} columns of `{}`",
            rows.len(),
            cols.len(),
            self.desc.id
        );
        let schema = Arc::new(self.batch.schema().project(cols)?);
        let columns = cols
            .iter()
            .map(|&c| take_rows(self.batch.column(c).as_ref(), rows))
            .collect::<Result<Vec<_>, _>>()?;
        let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
        Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
    }

    async fn at(&self, position: &[usize]) -> Result<Value, TableError> {
        let [row, col] = position else {
            return Err(RangeError::MalformedRange(format!(
                "expected a row and a column index into table `{}`, got {position:?}",
                self.desc.id
            ))
            .into());
        };
        if *col >= self.num_cols() {
            return Err(RangeError::OutOfRange {
                index: *col,
                size: self.num_cols(),
            }
            .into());
        }
        Value::from_array(self.batch.column(*col).as_ref(), *row)
    }
}

impl View<Table> {
    /// Column `i` of this view, restricted to the view's rows
    pub fn col(&self, i: usize) -> Result<View<Vector>, TableError> {
        let resolved = self.resolved()?;
        let cols = resolved.dim(1);
        let &col = cols.get(i).ok_or(RangeError::OutOfRange {
            index: i,
            size: cols.len(),
        })?;
        let vector = Arc::new(self.source().col(col)?);
        Ok(vector.view(Range1D::from_list(resolved.dim(0).to_vec())))
    }

    pub fn cols(&self) -> Result<Vec<View<Vector>>, TableError> {
        let resolved = self.resolved()?;
        let rows = Range1D::from_list(resolved.dim(0).to_vec());
        resolved
            .dim(1)
            .iter()
            .map(|&col| Ok(Arc::new(self.source().col(col)?).view(rows.clone())))
            .collect()
    }

    pub async fn objects(&self) -> Result<Vec<RowObject>, TableError> {
        let resolved = self.resolved()?;
        self.source().objects_of(&resolved).await
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
