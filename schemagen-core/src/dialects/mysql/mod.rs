//! MySQL dialect driver.
//!
//! # Module Structure
//! - `type_mapping`: MySQL type-name vocabulary per category
//! - `connection`: sqlx pool and prepared statements (feature `mysql`)
//!
//! MySQL exposes key metadata inline on `information_schema.columns`
//! (`column_key`, `extra`), so its columns query needs no joins.

#[cfg(feature = "mysql")]
mod connection;
pub mod type_mapping;


use super::DialectDriver;
use crate::classifier::TypeCategory;
use crate::executor::ColumnRecord;
use crate::models::{Column, DialectKeyInfo};
use crate::settings::{Dialect, Settings};

#[cfg(feature = "mysql")]
pub use connection::MySqlExecutor;

// information_schema columns are VARBINARY/unsigned in MySQL 8.0+;
// casting keeps decoding uniform across server versions.
const TABLES_QUERY: &str = r#"
        SELECT CAST(table_name AS CHAR) AS table_name
        FROM information_schema.tables
        WHERE table_type = 'BASE TABLE'
        AND table_schema = ?
        ORDER BY table_name
    "#;

const COLUMNS_QUERY: &str = r#"
        SELECT
          CAST(ordinal_position AS SIGNED) AS ordinal_position,
          CAST(column_name AS CHAR) AS column_name,
          CAST(data_type AS CHAR) AS data_type,
          CAST(column_default AS CHAR) AS column_default,
          CAST(is_nullable AS CHAR) AS is_nullable,
          CAST(character_maximum_length AS SIGNED) AS character_maximum_length,
          CAST(numeric_precision AS SIGNED) AS numeric_precision,
          CAST(datetime_precision AS SIGNED) AS datetime_precision,
          CAST(column_key AS CHAR) AS column_key,
          CAST(extra AS CHAR) AS extra
        FROM information_schema.columns
        WHERE table_name = ?
        AND table_schema = ?
        ORDER BY ordinal_position
    "#;

/// Driver for MySQL catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDriver;

impl DialectDriver for MySqlDriver {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    /// `user:pass@tcp(host:port)/dbname`
    fn build_connection_string(&self, settings: &Settings) -> String {
        format!(
            "{}:{}@tcp({}:{})/{}",
            settings.user,
            settings.password(),
            settings.host,
            settings.port,
            settings.db_name
        )
    }

    fn tables_query(&self) -> &'static str {
        TABLES_QUERY
    }

    fn columns_query_template(&self) -> &'static str {
        COLUMNS_QUERY
    }

    fn column_from_record(&self, record: ColumnRecord) -> Column {
        let [column_key, extra] = record.key_columns;
        Column {
            ordinal_position: record.ordinal_position,
            name: record.column_name,
            data_type: record.data_type,
            default_value: record.column_default,
            is_nullable: record.is_nullable,
            max_length: record.character_maximum_length,
            numeric_precision: record.numeric_precision,
            temporal_precision: record.datetime_precision,
            key_info: DialectKeyInfo::MySql {
                column_key: column_key.unwrap_or_default(),
                extra: extra.unwrap_or_default(),
            },
        }
    }

    fn is_primary_key(&self, column: &Column) -> bool {
        match &column.key_info {
            DialectKeyInfo::MySql { column_key, .. } => column_key.contains("PRI"),
            DialectKeyInfo::Postgres { .. } => false,
        }
    }

    fn is_auto_increment(&self, column: &Column) -> bool {
        match &column.key_info {
            DialectKeyInfo::MySql { extra, .. } => extra.contains("auto_increment"),
            DialectKeyInfo::Postgres { .. } => false,
        }
    }

    fn vocabulary(&self, category: TypeCategory) -> &'static [&'static str] {
        type_mapping::vocabulary(category)
    }
}
