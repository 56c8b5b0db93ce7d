//! Dialect-agnostic database facade.
//!
//! [`Database`] wraps exactly one [`DialectDriver`] together with an
//! injected [`CatalogExecutor`]. Callers reason in semantic categories and
//! key predicates only; per-dialect spellings never leave this layer.
//!
//! A run is strictly sequential: list tables, prepare the columns statement
//! once, then fetch each table's columns in order. The first failure aborts
//! the run; nothing is retried.

use crate::classifier::{TypeCategory, categorize, classify};
use crate::dialects::{self, DialectDriver};
use crate::error::redact_password;
use crate::executor::{CatalogExecutor, PreparedStatement};
use crate::models::{Column, Table, TableRegistry};
use crate::settings::{Dialect, Settings};
use crate::{Result, SchemaGenError};
use serde::Serialize;
use std::sync::Arc;

/// Classification and key predicates of one column, as handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ColumnTraits {
    pub is_string: bool,
    pub is_text: bool,
    pub is_integer: bool,
    pub is_float: bool,
    pub is_temporal: bool,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    pub is_nullable: bool,
}

impl ColumnTraits {
    /// The category flagged true, if any.
    pub fn category(&self) -> Option<TypeCategory> {
        [
            (self.is_string, TypeCategory::String),
            (self.is_text, TypeCategory::Text),
            (self.is_integer, TypeCategory::Integer),
            (self.is_float, TypeCategory::Float),
            (self.is_temporal, TypeCategory::Temporal),
        ]
        .into_iter()
        .find_map(|(flag, category)| flag.then_some(category))
    }
}

/// Generic database over one dialect driver.
pub struct Database {
    driver: Box<dyn DialectDriver>,
    executor: Arc<dyn CatalogExecutor>,
    settings: Settings,
    columns_statement: Option<Box<dyn PreparedStatement>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("dialect", &self.driver.dialect())
            .field("settings", &self.settings)
            .field("statement_prepared", &self.columns_statement.is_some())
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Creates a facade over `driver`, running queries through `executor`.
    pub fn new(
        driver: Box<dyn DialectDriver>,
        executor: Arc<dyn CatalogExecutor>,
        settings: Settings,
    ) -> Self {
        Self {
            driver,
            executor,
            settings,
            columns_statement: None,
        }
    }

    /// Connects with the driver matching `settings.dialect`.
    ///
    /// # Errors
    /// Returns error if the settings are invalid or the dialect is not
    /// compiled in
    pub async fn open(settings: Settings) -> Result<Self> {
        let executor = dialects::connect(&settings).await?;
        let driver = dialects::driver_for(settings.dialect);

        tracing::info!("Opened {} catalog at {}", driver.dialect(), settings);

        Ok(Self::new(driver, executor, settings))
    }

    /// Dialect of the underlying driver.
    pub fn dialect(&self) -> Dialect {
        self.driver.dialect()
    }

    /// Settings the database was opened with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Dialect driver supplying queries and vocabularies.
    pub fn driver(&self) -> &dyn DialectDriver {
        self.driver.as_ref()
    }

    /// The dialect's connection string, password included.
    pub fn data_source_name(&self) -> String {
        self.driver.build_connection_string(&self.settings)
    }

    /// The connection string with the password masked, for logs.
    pub fn redacted_data_source_name(&self) -> String {
        redact_password(&self.data_source_name(), self.settings.password())
    }

    /// Lists base tables in ascending name order.
    ///
    /// # Errors
    /// Returns [`SchemaGenError::Query`] carrying the schema name
    pub async fn tables(&self) -> Result<Vec<Table>> {
        self.driver
            .list_tables(self.executor.as_ref(), &self.settings)
            .await
    }

    /// Prepares the columns statement, once per run.
    ///
    /// Later calls reuse the statement already prepared.
    ///
    /// # Errors
    /// Returns [`SchemaGenError::Prepare`] if the statement cannot be compiled
    pub async fn prepare_columns_statement(&mut self) -> Result<()> {
        if self.columns_statement.is_some() {
            return Ok(());
        }

        let statement = self
            .executor
            .prepare(self.driver.columns_query_template())
            .await
            .map_err(|e| match e {
                SchemaGenError::Prepare { .. } => e,
                other => SchemaGenError::prepare_failed(other),
            })?;

        tracing::debug!("Prepared columns statement for {}", self.dialect());
        self.columns_statement = Some(statement);

        Ok(())
    }

    /// Populates `table.columns` using the prepared statement.
    ///
    /// # Errors
    /// Returns [`SchemaGenError::StatementNotPrepared`] if
    /// [`Self::prepare_columns_statement`] was not called, or
    /// [`SchemaGenError::Query`] if the statement fails
    pub async fn columns_of(&self, table: &mut Table) -> Result<()> {
        let statement = self
            .columns_statement
            .as_deref()
            .ok_or(SchemaGenError::StatementNotPrepared)?;

        self.driver
            .fetch_columns(statement, &self.settings, table)
            .await
    }

    /// Reflects the whole schema: tables, then each table's columns.
    ///
    /// # Errors
    /// Returns the first error encountered; no partial registry is returned
    pub async fn load_registry(&mut self) -> Result<TableRegistry> {
        let start_time = std::time::Instant::now();
        let schema = self.settings.catalog_schema().to_string();

        tracing::info!("Reflecting {} schema '{}'", self.dialect(), schema);

        let mut tables = self.tables().await.map_err(|e| {
            tracing::error!("Failed to list tables: {}", e);
            e
        })?;

        self.prepare_columns_statement().await?;

        for table in &mut tables {
            self.columns_of(table).await.map_err(|e| {
                tracing::error!("Failed to fetch columns: {}", e);
                e
            })?;
            tracing::debug!(
                "Collected table '{}' with {} columns",
                table.name,
                table.columns.len()
            );
        }

        let registry = TableRegistry::from_tables(tables);
        tracing::info!(
            "Reflected {} tables ({} columns) in {:.2}s",
            registry.len(),
            registry.column_count(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(registry)
    }

    /// Exact match against the dialect's bounded character types.
    pub fn is_string(&self, column: &Column) -> bool {
        classify(&column.data_type, self.driver.string_types())
    }

    /// Exact match against the dialect's unbounded text types.
    pub fn is_text(&self, column: &Column) -> bool {
        classify(&column.data_type, self.driver.text_types())
    }

    /// Exact match against the dialect's integer types.
    pub fn is_integer(&self, column: &Column) -> bool {
        classify(&column.data_type, self.driver.integer_types())
    }

    /// Exact match against the dialect's numeric types, exact ones included.
    pub fn is_float(&self, column: &Column) -> bool {
        classify(&column.data_type, self.driver.float_types())
    }

    /// Exact match against the dialect's date and time types.
    pub fn is_temporal(&self, column: &Column) -> bool {
        classify(&column.data_type, self.driver.temporal_types())
    }

    /// Primary key as reported by the dialect's key metadata.
    pub fn is_primary_key(&self, column: &Column) -> bool {
        self.driver.is_primary_key(column)
    }

    /// Auto increment as reported by the dialect's key metadata.
    pub fn is_auto_increment(&self, column: &Column) -> bool {
        self.driver.is_auto_increment(column)
    }

    /// Whether the column accepts NULL.
    pub fn is_nullable(&self, column: &Column) -> bool {
        self.driver.is_nullable(column)
    }

    /// Semantic category of `column`, `None` for unknown types.
    pub fn category(&self, column: &Column) -> Option<TypeCategory> {
        categorize(&column.data_type, self.driver.as_ref())
    }

    /// Every classification and key predicate for `column`.
    pub fn describe(&self, column: &Column) -> ColumnTraits {
        ColumnTraits {
            is_string: self.is_string(column),
            is_text: self.is_text(column),
            is_integer: self.is_integer(column),
            is_float: self.is_float(column),
            is_temporal: self.is_temporal(column),
            is_primary_key: self.is_primary_key(column),
            is_auto_increment: self.is_auto_increment(column),
            is_nullable: self.is_nullable(column),
        }
    }

    /// Drops the prepared statement and closes the executor.
    pub async fn close(mut self) {
        self.columns_statement = None;
        self.executor.close().await;
        tracing::debug!("Closed {} catalog connection", self.dialect());
    }
}

#[cfg(test)]
mod tests;
