use std::cmp::Ordering;
use std::fmt;

use tessera_column::datatype::DataType;
use tessera_column::encoding::EncodingType;
use tessera_column::field::Field;
use tessera_error::{Result, TesseraError};
use tessera_plan::catalog::TableEntry;

/// The fraction of input rows a predicate is expected to retain.
///
/// Totally ordered so configurations enumerating over selectivities have a
/// stable sort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selectivity(f64);

impl Selectivity {
    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(TesseraError::invariant_violation(format!(
                "selectivity must be within [0, 1], got {value}"
            )));
        }
        Ok(Selectivity(value))
    }

    pub const fn value(&self) -> f64 {
        self.0
    }
}

// Construction rejects NaN, so the derived PartialEq is total.
impl Eq for Selectivity {}

impl PartialOrd for Selectivity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Selectivity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Selectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Column metadata the calibration generator works with. Richer than the
/// catalog's `Field`: the generator cares about physical encodings and the
/// size of the value domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationColumnSpecification {
    pub column_name: String,
    pub data_type: DataType,
    pub encoding: EncodingType,
    pub row_count: usize,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTableSpecification {
    pub name: String,
    pub columns: Vec<CalibrationColumnSpecification>,
    pub row_count: usize,
}

impl CalibrationTableSpecification {
    /// All columns of the given data type and encoding, in declaration order.
    pub fn matching_columns(
        &self,
        data_type: DataType,
        encoding: EncodingType,
    ) -> Vec<(usize, &CalibrationColumnSpecification)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.data_type == data_type && c.encoding == encoding)
            .collect()
    }

    /// All columns of the given data type regardless of encoding.
    pub fn columns_of_type(
        &self,
        data_type: DataType,
    ) -> Vec<(usize, &CalibrationColumnSpecification)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.data_type == data_type)
            .collect()
    }

    /// Catalog view of this table. Encodings are invisible to the plan layer.
    pub fn to_table_entry(&self) -> TableEntry {
        TableEntry::new(
            self.name.clone(),
            self.columns
                .iter()
                .map(|c| Field::new(c.column_name.clone(), c.data_type, c.nullable)),
            self.row_count,
        )
    }
}

/// The axes the generator permutes over.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    pub data_types: Vec<DataType>,
    pub encodings: Vec<EncodingType>,
    pub selectivities: Vec<Selectivity>,
    pub reference_columns: Vec<bool>,
    pub row_counts: Vec<usize>,
    pub generate_index_scans: bool,
}

/// One synthetic table per configured row-count bucket, with one column per
/// valid (data type, encoding) combination.
pub fn generate_calibration_tables(config: &CalibrationConfig) -> Vec<CalibrationTableSpecification> {
    config
        .row_counts
        .iter()
        .map(|&row_count| {
            let mut columns = Vec::new();
            for &data_type in &config.data_types {
                for &encoding in &config.encodings {
                    if !encoding.supports(data_type) {
                        continue;
                    }
                    columns.push(CalibrationColumnSpecification {
                        column_name: format!("column_{data_type}_{encoding}").to_lowercase(),
                        data_type,
                        encoding,
                        row_count,
                        nullable: false,
                    });
                }
            }
            CalibrationTableSpecification {
                name: format!("calibration_{row_count}"),
                columns,
                row_count,
            }
        })
        .collect()
}
