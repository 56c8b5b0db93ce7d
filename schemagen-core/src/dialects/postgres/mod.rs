//! PostgreSQL dialect driver.
//!
//! # Module Structure
//! - `type_mapping`: PostgreSQL type-name vocabulary per category
//! - `connection`: sqlx pool and prepared statements (feature `postgresql`)
//!
//! PostgreSQL has no inline key flag on `information_schema.columns`; the
//! columns query recovers constraint name and type by joining
//! `key_column_usage` and `table_constraints`. Both joins are LEFT JOINs so
//! a column without any constraint still yields a row, with null
//! constraint fields.

#[cfg(feature = "postgresql")]
mod connection;
pub mod type_mapping;


use super::DialectDriver;
use crate::classifier::TypeCategory;
use crate::executor::ColumnRecord;
use crate::models::{Column, DialectKeyInfo};
use crate::settings::{Dialect, Settings};

#[cfg(feature = "postgresql")]
pub use connection::PgExecutor;

// information_schema uses domain types (sql_identifier, cardinal_number);
// the casts hand sqlx plain text and bigint values.
const TABLES_QUERY: &str = r#"
        SELECT table_name::text AS table_name
        FROM information_schema.tables
        WHERE table_type = 'BASE TABLE'
        AND table_schema = $1
        ORDER BY table_name
    "#;

const COLUMNS_QUERY: &str = r#"
        SELECT
            ic.ordinal_position::bigint AS ordinal_position,
            ic.column_name::text AS column_name,
            ic.data_type::text AS data_type,
            ic.column_default::text AS column_default,
            ic.is_nullable::text AS is_nullable,
            ic.character_maximum_length::bigint AS character_maximum_length,
            ic.numeric_precision::bigint AS numeric_precision,
            ic.datetime_precision::bigint AS datetime_precision,
            itc.constraint_name::text AS constraint_name,
            itc.constraint_type::text AS constraint_type
        FROM information_schema.columns AS ic
            LEFT JOIN information_schema.key_column_usage AS ikcu ON ic.table_name = ikcu.table_name
            AND ic.table_schema = ikcu.table_schema
            AND ic.column_name = ikcu.column_name
            LEFT JOIN information_schema.table_constraints AS itc ON ic.table_name = itc.table_name
            AND ic.table_schema = itc.table_schema
            AND ikcu.constraint_name = itc.constraint_name
        WHERE ic.table_name = $1
        AND ic.table_schema = $2
        ORDER BY ic.ordinal_position
    "#;

/// Driver for PostgreSQL catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;

impl DialectDriver for PostgresDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    /// Space separated `key=value` pairs with TLS disabled.
    fn build_connection_string(&self, settings: &Settings) -> String {
        format!(
            "host={} port={} user={} dbname={} password={} sslmode=disable",
            settings.host,
            settings.port,
            settings.user,
            settings.db_name,
            settings.password()
        )
    }

    fn tables_query(&self) -> &'static str {
        TABLES_QUERY
    }

    fn columns_query_template(&self) -> &'static str {
        COLUMNS_QUERY
    }

    fn column_from_record(&self, record: ColumnRecord) -> Column {
        let [constraint_name, constraint_type] = record.key_columns;
        Column {
            ordinal_position: record.ordinal_position,
            name: record.column_name,
            data_type: record.data_type,
            default_value: record.column_default,
            is_nullable: record.is_nullable,
            max_length: record.character_maximum_length,
            numeric_precision: record.numeric_precision,
            temporal_precision: record.datetime_precision,
            key_info: DialectKeyInfo::Postgres {
                constraint_name,
                constraint_type,
            },
        }
    }

    fn is_primary_key(&self, column: &Column) -> bool {
        match &column.key_info {
            DialectKeyInfo::Postgres {
                constraint_type: Some(constraint_type),
                ..
            } => constraint_type.contains("PRIMARY KEY"),
            _ => false,
        }
    }

    /// Serial columns default to `nextval('<seq>'::regclass)`. This is a
    /// heuristic: any default mentioning `nextval` counts.
    fn is_auto_increment(&self, column: &Column) -> bool {
        column
            .default_value
            .as_deref()
            .is_some_and(|default| default.contains("nextval"))
    }

    fn vocabulary(&self, category: TypeCategory) -> &'static [&'static str] {
        type_mapping::vocabulary(category)
    }
}
