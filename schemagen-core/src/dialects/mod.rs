//! Dialect driver contract and factory.
//!
//! A [`DialectDriver`] knows one database product's catalog queries, DSN
//! format, key/nullability encodings, and type-name vocabulary. Everything
//! above this layer talks to drivers only through [`crate::Database`].
//! Adding a dialect means implementing this trait and extending
//! [`driver_for`] and [`connect`]; nothing else changes.
//!
//! # Module Structure
//! - `mysql`: MySQL driver and its sqlx executor
//! - `postgres`: PostgreSQL driver and its sqlx executor

use crate::classifier::TypeCategory;
use crate::executor::{CatalogExecutor, ColumnRecord, PreparedStatement};
use crate::models::{Column, Table};
use crate::settings::{Dialect, Settings};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod mysql;
pub mod postgres;

pub use mysql::MySqlDriver;
pub use postgres::PostgresDriver;

/// Catalog access and type vocabulary for one SQL dialect.
///
/// # Object Safety
/// This trait is object-safe; the facade holds a `Box<dyn DialectDriver>`.
#[async_trait]
pub trait DialectDriver: Send + Sync {
    /// The dialect this driver implements.
    fn dialect(&self) -> Dialect;

    /// Builds the dialect's connection string. Purely textual; nothing is
    /// validated or dialed.
    fn build_connection_string(&self, settings: &Settings) -> String;

    /// Query listing base tables of one schema, ordered by name. Takes the
    /// schema as its only parameter.
    fn tables_query(&self) -> &'static str;

    /// Prepared statement text for one table's columns, bound as
    /// `(table_name, schema)`.
    fn columns_query_template(&self) -> &'static str;

    /// Builds a column from a raw columns-query row, attaching this
    /// dialect's key metadata.
    fn column_from_record(&self, record: ColumnRecord) -> Column;

    /// Whether this dialect's key metadata marks the column as primary key.
    fn is_primary_key(&self, column: &Column) -> bool;

    /// Whether the database generates the column's value on insert.
    fn is_auto_increment(&self, column: &Column) -> bool;

    /// Nullable iff the raw flag is exactly `YES`.
    fn is_nullable(&self, column: &Column) -> bool {
        column.is_nullable == "YES"
    }

    /// Exact catalog spellings belonging to `category`.
    fn vocabulary(&self, category: TypeCategory) -> &'static [&'static str];

    /// Bounded character spellings.
    fn string_types(&self) -> &'static [&'static str] {
        self.vocabulary(TypeCategory::String)
    }

    /// Unbounded text spellings.
    fn text_types(&self) -> &'static [&'static str] {
        self.vocabulary(TypeCategory::Text)
    }

    /// Integer spellings, serial pseudo-types included.
    fn integer_types(&self) -> &'static [&'static str] {
        self.vocabulary(TypeCategory::Integer)
    }

    /// Exact and approximate numeric spellings.
    fn float_types(&self) -> &'static [&'static str] {
        self.vocabulary(TypeCategory::Float)
    }

    /// Date and time spellings.
    fn temporal_types(&self) -> &'static [&'static str] {
        self.vocabulary(TypeCategory::Temporal)
    }

    /// Lists the base tables of the configured schema in ascending name
    /// order, each without columns.
    ///
    /// # Errors
    /// Returns [`crate::SchemaGenError::Query`] carrying the schema name. In
    /// verbose mode the failure is also logged; control flow is the same.
    async fn list_tables(
        &self,
        executor: &dyn CatalogExecutor,
        settings: &Settings,
    ) -> Result<Vec<Table>> {
        let schema = settings.catalog_schema();
        let params = [schema.to_string()];

        let mut names = match executor.fetch_names(self.tables_query(), &params).await {
            Ok(names) => names,
            Err(e) => {
                if settings.verbose {
                    tracing::error!("Failed to list tables: {}", e);
                    tracing::error!("schema: {:?}", schema);
                }
                return Err(e.in_context(schema, None));
            }
        };

        names.sort();
        tracing::debug!("Found {} tables in schema '{}'", names.len(), schema);

        Ok(names.into_iter().map(Table::new).collect())
    }

    /// Executes the prepared columns statement for `table` and stores the
    /// columns in ascending ordinal position.
    ///
    /// # Errors
    /// Returns [`crate::SchemaGenError::Query`] carrying schema and table names;
    /// `table.columns` is left untouched on failure.
    async fn fetch_columns(
        &self,
        statement: &dyn PreparedStatement,
        settings: &Settings,
        table: &mut Table,
    ) -> Result<()> {
        let schema = settings.catalog_schema();
        let params = [table.name.clone(), schema.to_string()];

        let records = match statement.fetch_records(&params).await {
            Ok(records) => records,
            Err(e) => {
                if settings.verbose {
                    tracing::error!("Failed to fetch columns of table '{}': {}", table.name, e);
                    tracing::error!("schema: {:?}", settings.schema);
                    if self.dialect() == Dialect::MySql {
                        tracing::error!("dbName: {:?}", settings.db_name);
                    }
                }
                return Err(e.in_context(schema, Some(&table.name)));
            }
        };

        let mut columns: Vec<Column> = records
            .into_iter()
            .map(|record| self.column_from_record(record))
            .collect();
        columns.sort_by_key(|c| c.ordinal_position);

        tracing::trace!("Table '{}' has {} columns", table.name, columns.len());
        table.columns = columns;

        Ok(())
    }
}

/// Returns the driver for `dialect`.
pub fn driver_for(dialect: Dialect) -> Box<dyn DialectDriver> {
    match dialect {
        Dialect::MySql => Box::new(MySqlDriver),
        Dialect::Postgres => Box::new(PostgresDriver),
    }
}

/// Opens a connection pool for the configured dialect.
///
/// The pool connects lazily: a bad host or password surfaces on the first
/// catalog query, not here.
///
/// # Errors
/// Returns a configuration error for invalid settings, or
/// [`crate::SchemaGenError::UnsupportedDialect`] when the dialect's feature
/// was not compiled in
pub async fn connect(settings: &Settings) -> Result<Arc<dyn CatalogExecutor>> {
    settings.validate()?;

    match settings.dialect {
        #[cfg(feature = "mysql")]
        Dialect::MySql => Ok(Arc::new(mysql::MySqlExecutor::connect(settings))),
        #[cfg(not(feature = "mysql"))]
        Dialect::MySql => Err(crate::SchemaGenError::unsupported_dialect(
            "mysql (compile with --features mysql)",
        )),
        #[cfg(feature = "postgresql")]
        Dialect::Postgres => Ok(Arc::new(postgres::PgExecutor::connect(settings))),
        #[cfg(not(feature = "postgresql"))]
        Dialect::Postgres => Err(crate::SchemaGenError::unsupported_dialect(
            "pg (compile with --features postgresql)",
        )),
    }
}
