//! PostgreSQL connection pool and prepared statements.
//!
//! # Security Features
//! - Sessions default to read-only transactions
//! - Passwords go into connect options, never into a URL or a log line

use crate::executor::{CatalogExecutor, ColumnRecord, PreparedStatement};
use crate::settings::Settings;
use crate::{Result, SchemaGenError};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode, PgStatement};
use sqlx::{Executor, Row, Statement};
use std::time::Duration;

/// Catalog executor backed by a sqlx PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    /// Creates a lazily connecting pool from `settings`, with TLS disabled
    /// to match the generated DSN.
    pub fn connect(settings: &Settings) -> Self {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(settings.password())
            .database(&settings.db_name)
            .ssl_mode(PgSslMode::Disable);

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET default_transaction_read_only = on")
                        .await?;
                    Ok(())
                })
            })
            .connect_lazy_with(options);

        tracing::debug!(
            "Created PostgreSQL pool for {}:{}/{}",
            settings.host,
            settings.port,
            settings.db_name
        );

        Self { pool }
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogExecutor for PgExecutor {
    async fn fetch_names(&self, sql: &str, params: &[String]) -> Result<Vec<String>> {
        let mut query = sqlx::query_scalar::<_, String>(sql);
        for param in params {
            query = query.bind(param.clone());
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaGenError::query_failed(String::new(), e))
    }

    async fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>> {
        let statement = (&self.pool)
            .prepare(sql)
            .await
            .map_err(SchemaGenError::prepare_failed)?;

        Ok(Box::new(PgPrepared {
            pool: self.pool.clone(),
            statement: Statement::to_owned(&statement),
        }))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

struct PgPrepared {
    pool: PgPool,
    statement: PgStatement<'static>,
}

#[async_trait]
impl PreparedStatement for PgPrepared {
    async fn fetch_records(&self, params: &[String]) -> Result<Vec<ColumnRecord>> {
        let mut query = self.statement.query();
        for param in params {
            query = query.bind(param.clone());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchemaGenError::query_failed(String::new(), e))?;

        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &PgRow) -> Result<ColumnRecord> {
    Ok(ColumnRecord {
        ordinal_position: get(row, "ordinal_position")?,
        column_name: get(row, "column_name")?,
        data_type: get(row, "data_type")?,
        column_default: get(row, "column_default")?,
        is_nullable: get(row, "is_nullable")?,
        character_maximum_length: get(row, "character_maximum_length")?,
        numeric_precision: get(row, "numeric_precision")?,
        datetime_precision: get(row, "datetime_precision")?,
        key_columns: [get(row, "constraint_name")?, get(row, "constraint_type")?],
    })
}

fn get<'r, T>(row: &'r PgRow, field: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(field)
        .map_err(|e| SchemaGenError::decode_failed(field, e))
}
