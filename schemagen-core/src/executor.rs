//! SQL execution contract consumed by the dialect drivers.
//!
//! The database handle is injected into [`crate::Database`] as an
//! `Arc<dyn CatalogExecutor>` instead of living in a global, so the facade
//! can be exercised against an in-memory double. The sqlx-backed
//! implementations live next to their dialect drivers.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One raw row of a columns query, decoded positionally.
///
/// Both dialects select the same eight leading columns; the two trailing
/// columns carry dialect-specific key metadata (`column_key`/`extra` on
/// MySQL, `constraint_name`/`constraint_type` on PostgreSQL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub ordinal_position: i64,
    pub column_name: String,
    pub data_type: String,
    pub column_default: Option<String>,
    pub is_nullable: String,
    pub character_maximum_length: Option<i64>,
    pub numeric_precision: Option<i64>,
    pub datetime_precision: Option<i64>,
    pub key_columns: [Option<String>; 2],
}

/// A handle able to run parameterized catalog queries.
///
/// Query errors are reported as [`crate::SchemaGenError::Query`]; drivers
/// fill in the schema and table they were filtering on.
#[async_trait]
pub trait CatalogExecutor: Send + Sync {
    /// Runs a parameterized query whose first column is a name.
    async fn fetch_names(&self, sql: &str, params: &[String]) -> Result<Vec<String>>;

    /// Compiles `sql` into a statement reusable for many executions.
    ///
    /// # Errors
    /// Returns [`crate::SchemaGenError::Prepare`] if compilation fails
    async fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>>;

    /// Releases the underlying connections.
    async fn close(&self) {}
}

/// A compiled columns query.
#[async_trait]
pub trait PreparedStatement: Send + Sync {
    /// Executes the statement with `params` bound in order.
    async fn fetch_records(&self, params: &[String]) -> Result<Vec<ColumnRecord>>;
}
