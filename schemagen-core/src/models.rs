//! Reflected catalog data: tables, columns, and the per-run table registry.
//!
//! Column fields keep the raw catalog spellings (`data_type`,
//! `is_nullable`); interpretation is left to the dialect driver that
//! produced them.

use serde::{Deserialize, Serialize};

/// Key and constraint metadata that only one dialect exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialect", rename_all = "lowercase")]
pub enum DialectKeyInfo {
    /// MySQL reports keys inline on `information_schema.columns`.
    MySql {
        /// `column_key`: `PRI`, `UNI`, `MUL` or empty
        column_key: String,
        /// `extra`: e.g. `auto_increment`
        extra: String,
    },
    /// PostgreSQL keys come from the joined constraint tables; a column
    /// without a constraint has both fields unset.
    Postgres {
        constraint_name: Option<String>,
        constraint_type: Option<String>,
    },
}

/// One catalog column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// 1-based position within the table
    pub ordinal_position: i64,
    pub name: String,
    /// Raw dialect type name, e.g. `varchar` or `timestamp with time zone`
    pub data_type: String,
    pub default_value: Option<String>,
    /// Raw nullability flag (`YES`/`NO`)
    pub is_nullable: String,
    pub max_length: Option<i64>,
    pub numeric_precision: Option<i64>,
    pub temporal_precision: Option<i64>,
    pub key_info: DialectKeyInfo,
}

/// One base table and its columns in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a table as discovered by the tables query, without columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Ordered tables reflected during one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRegistry {
    tables: Vec<Table>,
}

impl TableRegistry {
    /// Wraps tables in the order the catalog returned them.
    pub fn from_tables(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Tables in catalog order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Mutable access for filling in columns.
    pub fn tables_mut(&mut self) -> &mut [Table] {
        &mut self.tables
    }

    /// Table with exactly this name.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the schema had no base tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Iterates tables in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    /// Unwraps the table list.
    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }
}

impl<'a> IntoIterator for &'a TableRegistry {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

impl IntoIterator for TableRegistry {
    type Item = Table;
    type IntoIter = std::vec::IntoIter<Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
