//! Tests for the database facade against the in-memory executor.

use super::*;
use crate::executor::ColumnRecord;
use crate::memory::MemoryExecutor;
use crate::models::DialectKeyInfo;

fn record(position: i64, name: &str, data_type: &str) -> ColumnRecord {
    ColumnRecord {
        ordinal_position: position,
        column_name: name.to_string(),
        data_type: data_type.to_string(),
        is_nullable: "NO".to_string(),
        ..Default::default()
    }
}

fn pg_settings() -> Settings {
    Settings::new(Dialect::Postgres)
        .with_host("db")
        .with_user("u")
        .with_password("secret")
        .with_database("app")
}

fn pg_database(executor: &MemoryExecutor) -> Database {
    Database::new(
        dialects::driver_for(Dialect::Postgres),
        Arc::new(executor.clone()),
        pg_settings(),
    )
}

fn pg_column(data_type: &str) -> Column {
    Column {
        ordinal_position: 1,
        name: "c".to_string(),
        data_type: data_type.to_string(),
        default_value: None,
        is_nullable: "NO".to_string(),
        max_length: None,
        numeric_precision: None,
        temporal_precision: None,
        key_info: DialectKeyInfo::Postgres {
            constraint_name: None,
            constraint_type: None,
        },
    }
}

// =============================================================================
// Connection String Tests
// =============================================================================

#[test]
fn test_data_source_name_delegates_to_driver() {
    let database = pg_database(&MemoryExecutor::new());
    assert_eq!(database.dialect(), Dialect::Postgres);
    assert_eq!(
        database.data_source_name(),
        "host=db port=5432 user=u dbname=app password=secret sslmode=disable"
    );
}

#[test]
fn test_redacted_data_source_name_hides_password() {
    let database = pg_database(&MemoryExecutor::new());
    let redacted = database.redacted_data_source_name();
    assert!(!redacted.contains("secret"));
    assert!(redacted.contains("password=****"));
}

#[test]
fn test_debug_does_not_leak_password() {
    let database = pg_database(&MemoryExecutor::new());
    let debug = format!("{:?}", database);
    assert!(!debug.contains("secret"));
    assert!(debug.contains("statement_prepared: false"));
}

// =============================================================================
// Statement Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_prepare_columns_statement_is_idempotent() {
    let executor = MemoryExecutor::new();
    let mut database = pg_database(&executor);

    database.prepare_columns_statement().await.unwrap();
    database.prepare_columns_statement().await.unwrap();

    assert_eq!(executor.prepare_count(), 1);
    assert_eq!(
        executor.prepared_sql(),
        vec![database.driver().columns_query_template().to_string()]
    );
}

#[tokio::test]
async fn test_columns_of_requires_prepared_statement() {
    let executor = MemoryExecutor::new().with_table("public", "users", vec![record(1, "id", "integer")]);
    let database = pg_database(&executor);

    let mut table = Table::new("users");
    let error = database.columns_of(&mut table).await.unwrap_err();

    assert!(matches!(error, SchemaGenError::StatementNotPrepared));
    assert!(table.columns.is_empty());
    assert!(executor.executions().is_empty());
}

#[tokio::test]
async fn test_prepare_failure_is_reported_as_prepare_error() {
    let executor = MemoryExecutor::new().failing_prepare();
    let mut database = pg_database(&executor);

    let error = database.prepare_columns_statement().await.unwrap_err();
    assert!(matches!(error, SchemaGenError::Prepare { .. }));
}

#[tokio::test]
async fn test_columns_of_after_prepare() {
    let executor = MemoryExecutor::new().with_table(
        "public",
        "users",
        vec![record(2, "email", "text"), record(1, "id", "integer")],
    );
    let mut database = pg_database(&executor);
    database.prepare_columns_statement().await.unwrap();

    let mut table = Table::new("users");
    database.columns_of(&mut table).await.unwrap();

    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "email"]);
    assert_eq!(
        executor.executions(),
        vec![vec!["users".to_string(), "public".to_string()]]
    );
}

// =============================================================================
// Registry Tests
// =============================================================================

#[tokio::test]
async fn test_load_registry_reflects_all_tables_in_order() {
    let executor = MemoryExecutor::new()
        .with_table("public", "users", vec![record(1, "id", "integer")])
        .with_table(
            "public",
            "accounts",
            vec![record(2, "balance", "numeric"), record(1, "id", "bigint")],
        )
        .with_table("other", "hidden", vec![record(1, "id", "integer")]);
    let mut database = pg_database(&executor);

    let registry = database.load_registry().await.unwrap();

    let names: Vec<&str> = registry.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["accounts", "users"]);
    assert_eq!(registry.column_count(), 3);
    assert_eq!(executor.prepare_count(), 1);
    assert_eq!(
        executor.executions(),
        vec![
            vec!["accounts".to_string(), "public".to_string()],
            vec!["users".to_string(), "public".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_load_registry_empty_schema() {
    let executor = MemoryExecutor::new();
    let mut database = pg_database(&executor);

    let registry = database.load_registry().await.unwrap();
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_load_registry_aborts_when_listing_fails() {
    let executor = MemoryExecutor::new()
        .with_table("public", "users", vec![record(1, "id", "integer")])
        .failing_tables();
    let mut database = pg_database(&executor);

    let error = database.load_registry().await.unwrap_err();

    assert!(matches!(
        error,
        SchemaGenError::Query { ref schema, table: None, .. } if schema == "public"
    ));
    assert_eq!(executor.prepare_count(), 0);
    assert!(executor.executions().is_empty());
}

#[tokio::test]
async fn test_load_registry_aborts_on_first_column_failure() {
    let executor = MemoryExecutor::new()
        .with_table("public", "a", vec![record(1, "id", "integer")])
        .with_table("public", "b", vec![record(1, "id", "integer")])
        .with_table("public", "c", vec![record(1, "id", "integer")])
        .failing_columns("b");
    let mut database = pg_database(&executor);

    let error = database.load_registry().await.unwrap_err();

    assert!(matches!(
        error,
        SchemaGenError::Query { table: Some(ref t), .. } if t == "b"
    ));
    // "c" is never queried
    assert_eq!(executor.executions().len(), 2);
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_describe_integer_primary_key() {
    let database = pg_database(&MemoryExecutor::new());
    let mut column = pg_column("integer");
    column.default_value = Some("nextval('users_id_seq'::regclass)".to_string());
    column.key_info = DialectKeyInfo::Postgres {
        constraint_name: Some("users_pkey".to_string()),
        constraint_type: Some("PRIMARY KEY".to_string()),
    };

    let traits = database.describe(&column);

    assert!(traits.is_integer);
    assert!(traits.is_primary_key);
    assert!(traits.is_auto_increment);
    assert!(!traits.is_nullable);
    assert_eq!(traits.category(), Some(TypeCategory::Integer));
    assert_eq!(database.category(&column), Some(TypeCategory::Integer));
}

#[test]
fn test_describe_unknown_type_has_no_category() {
    let database = pg_database(&MemoryExecutor::new());
    let column = pg_column("jsonb");

    let traits = database.describe(&column);

    assert_eq!(traits, ColumnTraits::default());
    assert_eq!(traits.category(), None);
    assert_eq!(database.category(&column), None);
}

#[test]
fn test_category_predicates_follow_dialect() {
    let database = pg_database(&MemoryExecutor::new());
    assert!(database.is_string(&pg_column("character varying")));
    assert!(database.is_text(&pg_column("text")));
    assert!(database.is_float(&pg_column("double precision")));
    assert!(database.is_temporal(&pg_column("timestamp with time zone")));
    // MySQL spelling is not part of the PostgreSQL vocabulary
    assert!(!database.is_integer(&pg_column("tinyint")));
}

#[tokio::test]
async fn test_close_releases_executor() {
    let executor = MemoryExecutor::new();
    let mut database = pg_database(&executor);
    database.prepare_columns_statement().await.unwrap();

    database.close().await;

    assert!(executor.is_closed());
}
