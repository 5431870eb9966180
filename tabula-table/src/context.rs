use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use arrow::array::{ArrayRef, RecordBatch};
use serde::{Deserialize, Serialize};

use crate::{
    desc::{ColumnDesc, TableDesc},
    error::TableError,
    idtype::IdType,
    table::Table,
    vector::Vector,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulaConfig {
    /// Id type used for tables that do not name one
    pub default_idtype: String,
    /// Histogram bin count used when none is requested
    pub hist_bins: Option<usize>,
    /// Reject columns whose Arrow type does not match their value type instead of casting
    pub strict_types: bool,
}

impl Default for TabulaConfig {
    fn default() -> Self {
        Self {
            default_idtype: "_rows".to_string(),
            hist_bins: None,
            strict_types: true,
        }
    }
}

/// Entry point for building tables and vectors.
///
/// The context owns the id types, so tables built through the same context share row
/// ids whenever they share an id type.
#[derive(Debug, Default)]
pub struct TabulaContext {
    config: TabulaConfig,
    idtypes: RwLock<HashMap<String, Arc<IdType>>>,
}

impl TabulaContext {
    pub fn new(config: TabulaConfig) -> Self {
        Self {
            config,
            idtypes: Default::default(),
        }
    }

    pub fn config(&self) -> &TabulaConfig {
        &self.config
    }

    /// Get the id type named `name`, creating it if needed
    pub fn idtype(&self, name: &str) -> Arc<IdType> {
        if let Some(idtype) = self
            .idtypes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return idtype.clone();
        }
        self.idtypes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("creating id type `{name}`");
                Arc::new(IdType::new(name))
            })
            .clone()
    }

    /// Names of all id types created so far
    pub fn idtype_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .idtypes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn table(
        &self,
        desc: TableDesc,
        batch: RecordBatch,
        row_names: Vec<String>,
    ) -> Result<Arc<Table>, TableError> {
        let idtype = self.idtype(
            desc.idtype
                .as_deref()
                .unwrap_or(&self.config.default_idtype),
        );
        Ok(Arc::new(Table::try_new(
            desc,
            batch,
            row_names,
            idtype,
            &self.config,
        )?))
    }

    /// A standalone vector, built as a single column table
    pub fn vector(
        &self,
        desc: ColumnDesc,
        array: ArrayRef,
        row_names: Vec<String>,
        idtype: Option<&str>,
    ) -> Result<Arc<Vector>, TableError> {
        let mut table_desc = TableDesc::new(desc.name.clone(), vec![desc.clone()]);
        if let Some(idtype) = idtype {
            table_desc = table_desc.with_idtype(idtype);
        }
        let batch = RecordBatch::try_from_iter(vec![(desc.name.clone(), array)])?;
        let table = self.table(table_desc, batch, row_names)?;
        Ok(Arc::new(table.col(0)?))
    }
}
