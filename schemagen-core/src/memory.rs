//! In-memory catalog executor.
//!
//! Serves canned tables and column rows without a database, so the facade
//! and drivers can be tested (and tools built on them dry-run) offline.
//! SQL text is recorded but not interpreted: the tables query is answered
//! from the schema parameter, the columns statement from the
//! `(table, schema)` parameters. Rows come back in insertion order, which
//! plays the role of the catalog's physical order.

use crate::executor::{CatalogExecutor, ColumnRecord, PreparedStatement};
use crate::{Result, SchemaGenError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    tables: Vec<(String, String)>,
    columns: HashMap<(String, String), Vec<ColumnRecord>>,
    fail_tables: bool,
    fail_prepare: bool,
    fail_columns: HashSet<String>,
    prepared_sql: Vec<String>,
    executions: Vec<Vec<String>>,
    closed: bool,
}

/// Executor answering catalog queries from memory.
///
/// Clones share state, so a test can keep a handle for inspection after
/// moving one into [`crate::Database`].
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
    state: Arc<Mutex<State>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a base table to `schema` with its column rows.
    pub fn with_table(
        self,
        schema: impl Into<String>,
        table: impl Into<String>,
        records: Vec<ColumnRecord>,
    ) -> Self {
        {
            let mut state = self.state();
            let key = (schema.into(), table.into());
            state.tables.push(key.clone());
            state.columns.insert((key.1, key.0), records);
        }
        self
    }

    /// Makes the tables query fail.
    pub fn failing_tables(self) -> Self {
        self.state().fail_tables = true;
        self
    }

    /// Makes statement preparation fail.
    pub fn failing_prepare(self) -> Self {
        self.state().fail_prepare = true;
        self
    }

    /// Makes the columns statement fail for `table`.
    pub fn failing_columns(self, table: impl Into<String>) -> Self {
        self.state().fail_columns.insert(table.into());
        self
    }

    /// Number of statements prepared so far.
    pub fn prepare_count(&self) -> usize {
        self.state().prepared_sql.len()
    }

    /// SQL text of every prepared statement, in order.
    pub fn prepared_sql(&self) -> Vec<String> {
        self.state().prepared_sql.clone()
    }

    /// Bound parameters of every statement execution, in order.
    pub fn executions(&self) -> Vec<Vec<String>> {
        self.state().executions.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

fn canned_failure(what: &str) -> std::io::Error {
    std::io::Error::other(format!("{} failed", what))
}

#[async_trait]
impl CatalogExecutor for MemoryExecutor {
    async fn fetch_names(&self, _sql: &str, params: &[String]) -> Result<Vec<String>> {
        let state = self.state();
        if state.fail_tables {
            return Err(SchemaGenError::query_failed(
                String::new(),
                canned_failure("tables query"),
            ));
        }

        let schema = params.first().map(String::as_str).unwrap_or_default();
        Ok(state
            .tables
            .iter()
            .filter(|(s, _)| s == schema)
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>> {
        let mut state = self.state();
        if state.fail_prepare {
            return Err(SchemaGenError::prepare_failed(canned_failure("prepare")));
        }
        state.prepared_sql.push(sql.to_string());

        Ok(Box::new(MemoryStatement {
            state: Arc::clone(&self.state),
        }))
    }

    async fn close(&self) {
        self.state().closed = true;
    }
}

struct MemoryStatement {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl PreparedStatement for MemoryStatement {
    async fn fetch_records(&self, params: &[String]) -> Result<Vec<ColumnRecord>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.executions.push(params.to_vec());

        let table = params.first().cloned().unwrap_or_default();
        let schema = params.get(1).cloned().unwrap_or_default();

        if state.fail_columns.contains(&table) {
            return Err(SchemaGenError::query_failed(
                String::new(),
                canned_failure("columns query"),
            ));
        }

        Ok(state
            .columns
            .get(&(table, schema))
            .cloned()
            .unwrap_or_default())
    }
}
