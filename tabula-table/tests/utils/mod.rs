#![allow(dead_code)]

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, RecordBatch, StringArray};
use tabula_table::{
    Category, ColumnDesc, TabulaConfig, TabulaContext, Table, TableDesc, TableError, ValueType,
};

pub const ROW_NAMES: [&str; 12] = [
    "rih", "bri", "whi", "mad", "mjk", "bea", "tsw", "elv", "mar", "adl", "drk", "jbi",
];

pub const ARTISTS: [&str; 12] = [
    "Rihanna",
    "Britney Spears",
    "Whitney Houston",
    "Madonna",
    "Michael Jackson",
    "The Beatles",
    "Taylor Swift",
    "Elvis Presley",
    "Mariah Carey",
    "Adele",
    "Drake",
    "Justin Bieber",
];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn strs(values: [&str; 12]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

fn ints(values: [i64; 12]) -> ArrayRef {
    Arc::new(Int64Array::from(values.to_vec()))
}

/// The number one artists table: 12 rows and 14 columns, with a categorical column at
/// index 3 and a nullable int column at index 11
pub fn artists_batch() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("artist", strs(ARTISTS)),
        (
            "real_name",
            strs([
                "Robyn Fenty",
                "Britney Spears",
                "Whitney Houston",
                "Madonna Ciccone",
                "Michael Jackson",
                "The Beatles",
                "Taylor Swift",
                "Elvis Presley",
                "Mariah Carey",
                "Adele Adkins",
                "Aubrey Graham",
                "Justin Bieber",
            ]),
        ),
        (
            "country",
            strs(["BB", "US", "US", "US", "US", "UK", "US", "US", "US", "UK", "CA", "CA"]),
        ),
        (
            "gender",
            strs([
                "female", "female", "female", "female", "male", "group", "female", "male",
                "female", "female", "male", "male",
            ]),
        ),
        (
            "debut_year",
            ints([2005, 1998, 1985, 1982, 1971, 1962, 2006, 1956, 1990, 2008, 2006, 2009]),
        ),
        ("number_ones", ints([14, 5, 11, 12, 13, 20, 12, 18, 19, 5, 13, 8])),
        ("weeks_at_one", ints([60, 12, 40, 32, 37, 59, 34, 80, 91, 24, 42, 20])),
        ("albums", ints([8, 9, 7, 14, 10, 13, 11, 24, 15, 4, 8, 6])),
        ("grammys", ints([9, 1, 6, 7, 13, 7, 14, 3, 5, 16, 5, 2])),
        (
            "label",
            strs([
                "Def Jam", "Jive", "Arista", "Sire", "Epic", "Capitol", "Republic", "RCA",
                "Columbia", "XL", "OVO", "Def Jam",
            ]),
        ),
        (
            "active",
            strs([
                "yes", "no", "no", "yes", "no", "no", "yes", "no", "yes", "yes", "yes", "yes",
            ]),
        ),
        (
            "age_at_first",
            Arc::new(Int64Array::from(vec![
                Some(18),
                Some(17),
                Some(21),
                Some(26),
                Some(11),
                Some(23),
                Some(22),
                Some(21),
                Some(20),
                Some(22),
                Some(29),
                None,
            ])) as ArrayRef,
        ),
        (
            "streams",
            Arc::new(Float64Array::from(vec![
                42.1, 18.3, 15.9, 20.4, 35.7, 30.2, 60.8, 12.5, 25.6, 38.9, 75.3, 48.2,
            ])) as ArrayRef,
        ),
        (
            "rating",
            Arc::new(Float64Array::from(vec![
                8.1, 7.2, 9.0, 8.4, 9.5, 9.6, 8.8, 9.1, 8.6, 9.2, 7.9, 7.0,
            ])) as ArrayRef,
        ),
    ])
    .expect("valid artists batch")
}

pub fn artists_desc() -> TableDesc {
    TableDesc::new(
        "number-one-artists",
        vec![
            ColumnDesc::new("artist", ValueType::String),
            ColumnDesc::new("real_name", ValueType::String),
            ColumnDesc::new("country", ValueType::String),
            ColumnDesc::new(
                "gender",
                ValueType::Categorical {
                    categories: vec![
                        Category::new("female").with_color("#e41a1c"),
                        Category::new("male").with_color("#377eb8"),
                        Category::new("group").with_color("#4daf4a"),
                    ],
                },
            ),
            ColumnDesc::new("debut_year", ValueType::int()),
            ColumnDesc::new("number_ones", ValueType::int()),
            ColumnDesc::new("weeks_at_one", ValueType::int()),
            ColumnDesc::new("albums", ValueType::int()),
            ColumnDesc::new("grammys", ValueType::int()),
            ColumnDesc::new("label", ValueType::String),
            ColumnDesc::new("active", ValueType::categorical(["yes", "no"])),
            ColumnDesc::new("age_at_first", ValueType::int()),
            ColumnDesc::new("streams", ValueType::real()),
            ColumnDesc::new("rating", ValueType::Real { range: Some((0.0, 10.0)) }),
        ],
    )
    .with_name("Artists")
    .with_idtype("artist")
}

pub fn artists_table_with(config: TabulaConfig) -> Result<Arc<Table>, TableError> {
    let ctx = TabulaContext::new(config);
    ctx.table(
        artists_desc(),
        artists_batch(),
        ROW_NAMES.iter().map(|s| s.to_string()).collect(),
    )
}

pub fn artists_table() -> Arc<Table> {
    init_logging();
    artists_table_with(TabulaConfig::default()).expect("valid artists table")
}

pub fn strings(array: &dyn Array) -> Vec<String> {
    array
        .as_string::<i32>()
        .iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}
