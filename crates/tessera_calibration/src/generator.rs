use std::fmt;
use std::sync::Arc;

use tessera_column::datatype::DataType;
use tessera_column::encoding::EncodingType;
use tessera_error::{OptionExt, Result};
use tessera_plan::lqp::node::LqpNodeRef;
use tessera_plan::lqp::predicate::{PredicateNode, ScanType};
use tessera_plan::lqp::stored_table::StoredTableNode;
use tessera_plan::lqp::validate::ValidateNode;
use tracing::{debug, trace};

use crate::config::{CalibrationConfig, CalibrationTableSpecification, Selectivity};
use crate::predicates::{PredicateGenerator, PREDICATE_GENERATORS};

/// One point in the calibration space.
///
/// The derived ordering is lexicographic over the fields in declaration
/// order; `generate_predicate_permutations` emits configurations sorted by
/// it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PredicateConfiguration {
    pub table_name: String,
    pub data_type: DataType,
    pub encoding: EncodingType,
    pub selectivity: Selectivity,
    pub reference_column: bool,
    pub row_count: usize,
}

impl fmt::Display for PredicateConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} selectivity: {} reference_column: {} rows: {}",
            self.table_name,
            self.data_type,
            self.encoding,
            self.selectivity,
            self.reference_column,
            self.row_count
        )
    }
}

/// Enumerate every valid permutation of the configured axes over the given
/// tables.
///
/// Pure: the same tables and config produce the identical ordered sequence
/// on every call. Encodings that cannot hold the data type are skipped.
pub fn generate_predicate_permutations(
    tables: &[(String, usize)],
    config: &CalibrationConfig,
) -> Vec<PredicateConfiguration> {
    let mut permutations = Vec::new();

    for (table_name, row_count) in tables {
        for &data_type in &config.data_types {
            for &encoding in &config.encodings {
                if !encoding.supports(data_type) {
                    continue;
                }
                for &selectivity in &config.selectivities {
                    for &reference_column in &config.reference_columns {
                        permutations.push(PredicateConfiguration {
                            table_name: table_name.clone(),
                            data_type,
                            encoding,
                            selectivity,
                            reference_column,
                            row_count: *row_count,
                        });
                    }
                }
            }
        }
    }

    permutations.sort();
    permutations
}

/// A generated plan fragment: a predicate over a stored-table leaf, plus
/// optionally the same predicate as an index scan.
#[derive(Debug)]
pub struct CalibrationQuery {
    pub configuration: PredicateConfiguration,
    pub predicate_kind: &'static str,
    pub plan: LqpNodeRef,
    pub index_scan_plan: Option<LqpNodeRef>,
}

/// Emits predicate LQP fragments for training the cost model.
#[derive(Debug)]
pub struct CalibrationQueryGenerator {
    config: CalibrationConfig,
    tables: Vec<CalibrationTableSpecification>,
}

impl CalibrationQueryGenerator {
    pub fn new(config: CalibrationConfig, tables: Vec<CalibrationTableSpecification>) -> Self {
        CalibrationQueryGenerator { config, tables }
    }

    pub fn generate_queries(&self) -> Result<Vec<CalibrationQuery>> {
        let table_rows: Vec<(String, usize)> = self
            .tables
            .iter()
            .map(|t| (t.name.clone(), t.row_count))
            .collect();

        let permutations = generate_predicate_permutations(&table_rows, &self.config);
        debug!(
            permutations = permutations.len(),
            tables = self.tables.len(),
            "generating calibration queries"
        );

        let mut queries = Vec::new();
        for configuration in permutations {
            // Permutations are derived from this same table list.
            let table = self
                .tables
                .iter()
                .find(|t| t.name == configuration.table_name)
                .required("table specification")?;

            for (kind, generator) in PREDICATE_GENERATORS {
                if let Some(query) =
                    self.generate_query(table, &configuration, kind, *generator)?
                {
                    queries.push(query);
                }
            }
        }

        Ok(queries)
    }

    fn generate_query(
        &self,
        table: &CalibrationTableSpecification,
        configuration: &PredicateConfiguration,
        predicate_kind: &'static str,
        generator: PredicateGenerator,
    ) -> Result<Option<CalibrationQuery>> {
        let table_node = StoredTableNode::new(Arc::new(table.to_table_entry()));

        let Some(predicate) = generator(&table_node, table, configuration)? else {
            trace!(%configuration, predicate_kind, "no matching column, skipping");
            return Ok(None);
        };

        // Scanning a reference column means scanning the output of another
        // operator rather than the table itself.
        let input = if configuration.reference_column {
            ValidateNode::new(table_node.clone())
        } else {
            table_node.clone()
        };

        let plan = PredicateNode::new(predicate.clone(), input);

        // The index variant shares the stored-table leaf with the main plan;
        // indexes only exist on unscanned dictionary segments.
        let index_scan_plan = (self.config.generate_index_scans
            && configuration.encoding == EncodingType::Dictionary
            && !configuration.reference_column)
            .then(|| {
                PredicateNode::with_scan_type(
                    predicate.clone(),
                    ScanType::IndexScan,
                    table_node.clone(),
                )
            });

        Ok(Some(CalibrationQuery {
            configuration: configuration.clone(),
            predicate_kind,
            plan,
            index_scan_plan,
        }))
    }
}
