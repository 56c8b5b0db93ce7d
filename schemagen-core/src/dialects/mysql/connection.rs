//! MySQL connection pool and prepared statements.
//!
//! # Security Features
//! - Sessions are switched to read-only right after connecting
//! - Passwords go into connect options, never into a URL or a log line

use crate::executor::{CatalogExecutor, ColumnRecord, PreparedStatement};
use crate::settings::Settings;
use crate::{Result, SchemaGenError};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlStatement};
use sqlx::{Executor, Row, Statement};
use std::time::Duration;

/// Catalog executor backed by a sqlx MySQL pool.
#[derive(Debug, Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Creates a lazily connecting pool from `settings`.
    pub fn connect(settings: &Settings) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(settings.password())
            .database(&settings.db_name);

        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET SESSION TRANSACTION READ ONLY").await?;
                    Ok(())
                })
            })
            .connect_lazy_with(options);

        tracing::debug!(
            "Created MySQL pool for {}:{}/{}",
            settings.host,
            settings.port,
            settings.db_name
        );

        Self { pool }
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogExecutor for MySqlExecutor {
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

        Ok(Box::new(MySqlPrepared {
            pool: self.pool.clone(),
            statement: Statement::to_owned(&statement),
        }))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Columns statement compiled on the server once per run.
struct MySqlPrepared {
    pool: MySqlPool,
    statement: MySqlStatement<'static>,
}

#[async_trait]
impl PreparedStatement for MySqlPrepared {
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

fn record_from_row(row: &MySqlRow) -> Result<ColumnRecord> {
    Ok(ColumnRecord {
        ordinal_position: get(row, 0, "ordinal_position")?,
        column_name: get(row, 1, "column_name")?,
        data_type: get(row, 2, "data_type")?,
        column_default: get(row, 3, "column_default")?,
        is_nullable: get(row, 4, "is_nullable")?,
        character_maximum_length: get(row, 5, "character_maximum_length")?,
        numeric_precision: get(row, 6, "numeric_precision")?,
        datetime_precision: get(row, 7, "datetime_precision")?,
        key_columns: [get(row, 8, "column_key")?, get(row, 9, "extra")?],
    })
}

fn get<'r, T>(row: &'r MySqlRow, index: usize, field: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(index)
        .map_err(|e| SchemaGenError::decode_failed(field, e))
}
