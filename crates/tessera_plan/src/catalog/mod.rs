use std::collections::HashMap;
use std::sync::Arc;

use tessera_column::field::{Field, Schema};
use tessera_error::{Result, TesseraError};

/// A set of column indices declared to form a key of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    pub columns: Vec<usize>,
}

/// Catalog metadata for a single table.
///
/// Immutable once published; plan nodes hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub name: String,
    pub columns: Vec<Field>,
    pub row_count: usize,
    pub unique_constraints: Vec<TableConstraint>,
}

impl TableEntry {
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = Field>,
        row_count: usize,
    ) -> Self {
        TableEntry {
            name: name.into(),
            columns: columns.into_iter().collect(),
            row_count,
            unique_constraints: Vec::new(),
        }
    }

    /// Declare a unique constraint over the given column indices.
    pub fn with_unique_constraint(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.unique_constraints.push(TableConstraint {
            columns: columns.into_iter().collect(),
        });
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().cloned())
    }

    pub fn column(&self, idx: usize) -> Result<&Field> {
        self.columns.get(idx).ok_or_else(|| {
            TesseraError::unknown_column(format!(
                "no column at index {idx} in table '{}' ({} columns)",
                self.name,
                self.columns.len()
            ))
        })
    }
}

/// Read-only lookup of table metadata by name.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, Arc<TableEntry>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&mut self, entry: TableEntry) -> Result<Arc<TableEntry>> {
        if self.tables.contains_key(&entry.name) {
            return Err(TesseraError::new(format!(
                "duplicate table name: {}",
                entry.name
            )));
        }
        let entry = Arc::new(entry);
        self.tables.insert(entry.name.clone(), entry.clone());
        Ok(entry)
    }

    pub fn get_table(&self, name: &str) -> Result<Arc<TableEntry>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| TesseraError::new(format!("missing table: {name}")))
    }

    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tables.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
