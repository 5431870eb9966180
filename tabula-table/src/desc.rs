use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

/// One category of a categorical column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            label: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label if one is set, otherwise the name
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// The logical type of a column's values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueType {
    Categorical {
        categories: Vec<Category>,
    },
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<(i64, i64)>,
    },
    Real {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<(f64, f64)>,
    },
    String,
}

impl ValueType {
    pub fn categorical<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical {
            categories: names.into_iter().map(Category::new).collect(),
        }
    }

    pub fn int() -> Self {
        Self::Int { range: None }
    }

    pub fn real() -> Self {
        Self::Real { range: None }
    }

    /// Arrow type the column is stored as
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Categorical { .. } | Self::String => DataType::Utf8,
            Self::Int { .. } => DataType::Int64,
            Self::Real { .. } => DataType::Float64,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int { .. } | Self::Real { .. })
    }

    /// Declared value range of a numeric type
    pub fn value_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Int { range } => range.map(|(lo, hi)| (lo as f64, hi as f64)),
            Self::Real { range } => *range,
            _ => None,
        }
    }

    pub fn categories(&self) -> Option<&[Category]> {
        match self {
            Self::Categorical { categories } => Some(categories),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Categorical { .. } => "categorical",
            Self::Int { .. } => "int",
            Self::Real { .. } => "real",
            Self::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDesc {
    pub name: String,
    pub value_type: ValueType,
}

impl ColumnDesc {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// Metadata of a table. `idtype` names the id type its rows are registered with, the
/// context's default id type is used when it is not set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDesc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub idtype: Option<String>,
    pub columns: Vec<ColumnDesc>,
}

impl TableDesc {
    pub fn new(id: impl Into<String>, columns: Vec<ColumnDesc>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            idtype: None,
            columns,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_idtype(mut self, idtype: impl Into<String>) -> Self {
        self.idtype = Some(idtype.into());
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
