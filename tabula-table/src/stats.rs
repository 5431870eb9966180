use std::collections::HashMap;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use serde::{Deserialize, Serialize};

use crate::{desc::ColumnDesc, error::TableError};

/// Summary statistics of a numeric column.
///
/// Nulls and NaN values are counted in `nans` and excluded from everything else. `var`
/// is the sample variance and is NaN with fewer than two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub nans: usize,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub mean: f64,
    pub var: f64,
    pub sd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Histogram {
    /// Equal width bins over `range`, the last bin includes its upper edge
    Numerical {
        range: (f64, f64),
        counts: Vec<usize>,
        missing: usize,
    },
    /// One bin per category, in declaration order
    Categorical {
        categories: Vec<String>,
        counts: Vec<usize>,
        missing: usize,
    },
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.counts().len()
    }

    pub fn counts(&self) -> &[usize] {
        match self {
            Histogram::Numerical { counts, .. } | Histogram::Categorical { counts, .. } => counts,
        }
    }

    /// Number of values that fall in no bin
    pub fn missing(&self) -> usize {
        match self {
            Histogram::Numerical { missing, .. } | Histogram::Categorical { missing, .. } => {
                *missing
            }
        }
    }
}

/// Non-missing values of a numeric array, plus the number of missing ones
fn numeric_values(column: &str, array: &dyn Array) -> Result<(Vec<f64>, usize), TableError> {
    let values: Vec<Option<f64>> = match array.data_type() {
        DataType::Int64 => array
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map(|v| v as f64))
            .collect(),
        DataType::Float64 => array.as_primitive::<Float64Type>().iter().collect(),
        other => {
            return Err(TableError::TypeMismatch {
                column: column.to_string(),
                expected: "a numeric column".to_string(),
                actual: other.to_string(),
            });
        }
    };
    let total = values.len();
    let present: Vec<f64> = values.into_iter().flatten().filter(|v| !v.is_nan()).collect();
    let missing = total - present.len();
    Ok((present, missing))
}

pub fn compute_statistics(column: &str, array: &dyn Array) -> Result<Statistics, TableError> {
    let (values, nans) = numeric_values(column, array)?;
    let count = values.len();
    let sum: f64 = values.iter().sum();
    let (min, max) = if count == 0 {
        (f64::NAN, f64::NAN)
    } else {
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    };
    let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
    let var = if count < 2 {
        f64::NAN
    } else {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64
    };
    Ok(Statistics {
        count,
        nans,
        min,
        max,
        sum,
        mean,
        var,
        sd: var.sqrt(),
    })
}

/// Bin count used when none is requested
pub fn default_bins(count: usize) -> usize {
    ((count as f64).sqrt().round() as usize).max(1)
}

/// Histogram of a numeric or categorical column.
///
/// Numeric columns are binned over the declared value range of the column, or over
/// the observed `[min, max]` if none is declared. `bins` defaults to the rounded square
/// root of the number of values.
pub fn compute_histogram(
    desc: &ColumnDesc,
    array: &dyn Array,
    bins: Option<usize>,
) -> Result<Histogram, TableError> {
    if let Some(categories) = desc.value_type.categories() {
        return categorical_histogram(desc, categories.iter().map(|c| c.name.as_str()), array);
    }
    if !desc.value_type.is_numeric() {
        return Err(TableError::TypeMismatch {
            column: desc.name.clone(),
            expected: "a numeric or categorical column".to_string(),
            actual: desc.value_type.name().to_string(),
        });
    }

    let (values, mut missing) = numeric_values(&desc.name, array)?;
    let bins = bins.unwrap_or_else(|| default_bins(values.len())).max(1);
    let (lo, hi) = match desc.value_type.value_range() {
        Some(range) => range,
        None if values.is_empty() => (f64::NAN, f64::NAN),
        None => values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            }),
    };

    let mut counts = vec![0; bins];
    let width = (hi - lo) / bins as f64;
    for v in values {
        if !(lo..=hi).contains(&v) {
            missing += 1;
            continue;
        }
        let bin = if width > 0.0 {
            (((v - lo) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[bin] += 1;
    }
    Ok(Histogram::Numerical {
        range: (lo, hi),
        counts,
        missing,
    })
}

fn categorical_histogram<'a>(
    desc: &ColumnDesc,
    categories: impl Iterator<Item = &'a str>,
    array: &dyn Array,
) -> Result<Histogram, TableError> {
    let Some(strings) = array.as_string_opt::<i32>() else {
        return Err(TableError::TypeMismatch {
            column: desc.name.clone(),
            expected: DataType::Utf8.to_string(),
            actual: array.data_type().to_string(),
        });
    };
    let categories: Vec<String> = categories.map(str::to_string).collect();
    let positions: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut counts = vec![0; categories.len()];
    let mut missing = 0;
    for value in strings.iter() {
        match value.and_then(|v| positions.get(v)) {
            Some(&i) => counts[i] += 1,
            None => missing += 1,
        }
    }
    Ok(Histogram::Categorical {
        categories,
        counts,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::ValueType;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_statistics_skip_nulls() {
        let array = Int64Array::from(vec![Some(12), None, Some(11), Some(20), Some(17)]);
        let stats = compute_statistics("age", &array).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.nans, 1);
        assert_approx_eq!(f64, stats.min, 11.0);
        assert_approx_eq!(f64, stats.max, 20.0);
        assert_approx_eq!(f64, stats.sum, 60.0);
        assert_approx_eq!(f64, stats.mean, 15.0);
        // (9 + 16 + 25 + 4) / 3
        assert_approx_eq!(f64, stats.var, 18.0);
        assert_approx_eq!(f64, stats.sd, 18.0f64.sqrt());
    }

    #[test]
    fn test_statistics_nan_and_small() {
        let array = Float64Array::from(vec![Some(f64::NAN), Some(2.5), None]);
        let stats = compute_statistics("x", &array).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.nans, 2);
        assert_approx_eq!(f64, stats.mean, 2.5);
        assert!(stats.var.is_nan());

        let empty = Float64Array::from(Vec::<f64>::new());
        let stats = compute_statistics("x", &empty).unwrap();
        assert_eq!(stats.count, 0);
        assert!(stats.min.is_nan() && stats.mean.is_nan());
        assert_approx_eq!(f64, stats.sum, 0.0);
    }

    #[test]
    fn test_statistics_type_mismatch() {
        let array = StringArray::from(vec!["a"]);
        assert!(matches!(
            compute_statistics("name", &array),
            Err(TableError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_numerical_histogram() {
        let desc = ColumnDesc::new("x", ValueType::real());
        let array = Float64Array::from(vec![
            Some(0.0),
            Some(1.0),
            Some(2.5),
            Some(4.0),
            None,
            Some(3.9),
            Some(2.0),
            Some(0.5),
            Some(1.5),
            Some(3.0),
        ]);
        // 9 values, 3 bins over [0, 4]
        let hist = compute_histogram(&desc, &array, None).unwrap();
        assert_eq!(
            hist,
            Histogram::Numerical {
                range: (0.0, 4.0),
                counts: vec![3, 3, 3],
                missing: 1,
            }
        );

        let hist = compute_histogram(&desc, &array, Some(2)).unwrap();
        assert_eq!(hist.counts(), &[4, 5]);
    }

    #[test]
    fn test_declared_range() {
        let desc = ColumnDesc::new("age", ValueType::Int { range: Some((10, 20)) });
        let array = Int64Array::from(vec![10, 14, 20, 25]);
        let hist = compute_histogram(&desc, &array, Some(2)).unwrap();
        assert_eq!(hist.counts(), &[2, 1]);
        assert_eq!(hist.missing(), 1);
    }

    #[test]
    fn test_constant_column() {
        let desc = ColumnDesc::new("x", ValueType::int());
        let array = Int64Array::from(vec![7, 7, 7, 7]);
        let hist = compute_histogram(&desc, &array, None).unwrap();
        assert_eq!(hist.counts(), &[4, 0]);
    }

    #[test]
    fn test_categorical_histogram() {
        let desc = ColumnDesc::new("gender", ValueType::categorical(["female", "male", "group"]));
        let array = StringArray::from(vec![
            Some("male"),
            Some("female"),
            None,
            Some("female"),
            Some("duo"),
        ]);
        let hist = compute_histogram(&desc, &array, None).unwrap();
        assert_eq!(
            hist,
            Histogram::Categorical {
                categories: vec!["female".into(), "male".into(), "group".into()],
                counts: vec![2, 1, 0],
                missing: 2,
            }
        );
        assert_eq!(hist.bins(), 3);
    }

    #[test]
    fn test_string_histogram_is_mismatch() {
        let desc = ColumnDesc::new("name", ValueType::String);
        let array = StringArray::from(vec!["a"]);
        assert!(matches!(
            compute_histogram(&desc, &array, None),
            Err(TableError::TypeMismatch { .. })
        ));
    }
}
