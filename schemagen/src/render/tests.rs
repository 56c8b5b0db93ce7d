use super::*;
use schemagen_core::memory::MemoryExecutor;
use schemagen_core::{ColumnRecord, Dialect, DialectKeyInfo, Settings, driver_for};
use std::sync::Arc;

fn database(dialect: Dialect) -> Database {
    Database::new(
        driver_for(dialect),
        Arc::new(MemoryExecutor::new()),
        Settings::new(dialect).with_database("shop"),
    )
}

fn mysql_column(position: i64, name: &str, data_type: &str, nullable: bool, key: &str) -> Column {
    Column {
        ordinal_position: position,
        name: name.to_string(),
        data_type: data_type.to_string(),
        default_value: None,
        is_nullable: if nullable { "YES" } else { "NO" }.to_string(),
        max_length: None,
        numeric_precision: None,
        temporal_precision: None,
        key_info: DialectKeyInfo::MySql {
            column_key: key.to_string(),
            extra: if key == "PRI" { "auto_increment" } else { "" }.to_string(),
        },
    }
}

fn orders() -> Table {
    Table {
        name: "order_items".to_string(),
        columns: vec![
            mysql_column(1, "id", "int", false, "PRI"),
            mysql_column(2, "unitPrice", "decimal", false, ""),
            mysql_column(3, "type", "varchar", true, ""),
            mysql_column(4, "shipped_on", "date", true, ""),
            mysql_column(5, "updated_at", "timestamp", false, ""),
            mysql_column(6, "payload", "json", true, ""),
            mysql_column(7, "note", "text", false, ""),
        ],
    }
}

fn options() -> RenderOptions {
    RenderOptions {
        sqlx: true,
        ..Default::default()
    }
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_naming_upper_camel() {
    assert_eq!(upper_camel("order_items"), "OrderItems");
    assert_eq!(upper_camel("orderItems"), "OrderItems");
    assert_eq!(upper_camel("HTTPRequests"), "HttpRequests");
    assert_eq!(upper_camel("user-accounts 2"), "UserAccounts2");
}

#[test]
fn test_naming_snake_case() {
    assert_eq!(snake_case("unitPrice"), "unit_price");
    assert_eq!(snake_case("UserID"), "user_id");
    assert_eq!(snake_case("already_snake"), "already_snake");
    assert_eq!(snake_case("Address2Line"), "address2_line");
    assert_eq!(snake_case("--"), "");
}

#[test]
fn test_naming_struct_name_with_affixes() {
    let options = RenderOptions {
        prefix: "Db".to_string(),
        suffix: "Row".to_string(),
        ..Default::default()
    };
    assert_eq!(struct_name("order_items", &options), "DbOrderItemsRow");
    assert_eq!(struct_name("2fa_codes", &RenderOptions::default()), "_2faCodes");
    assert_eq!(struct_name("self", &RenderOptions::default()), "Self_");
}

#[test]
fn test_naming_field_escapes_keywords_and_digits() {
    let mut column = mysql_column(3, "type", "varchar", false, "");
    assert_eq!(field_name(&column), "r#type");

    column.name = "self".to_string();
    assert_eq!(field_name(&column), "self_");

    column.name = "1st_place".to_string();
    assert_eq!(field_name(&column), "_1st_place");

    column.name = "%".to_string();
    assert_eq!(field_name(&column), "column_3");
}

// =============================================================================
// Type Mapping Tests
// =============================================================================

#[test]
fn test_render_rust_types() {
    let database = database(Dialect::MySql);
    let table = orders();
    let types: Vec<String> = table
        .columns
        .iter()
        .map(|c| rust_type(c, &database.describe(c)))
        .collect();

    assert_eq!(
        types,
        [
            "i32",
            "rust_decimal::Decimal",
            "Option<String>",
            "Option<chrono::NaiveDate>",
            "chrono::NaiveDateTime",
            "Option<Vec<u8>>",
            "String",
        ]
    );
}

#[test]
fn test_render_rust_types_follow_dialect_vocabulary() {
    // `integer` is a PostgreSQL spelling only
    let column = mysql_column(1, "n", "integer", false, "");
    let mysql = database(Dialect::MySql);
    assert_eq!(rust_type(&column, &mysql.describe(&column)), "Vec<u8>");

    let postgres = database(Dialect::Postgres);
    assert_eq!(rust_type(&column, &postgres.describe(&column)), "i32");
}

#[test]
fn test_render_rust_types_follow_column_width() {
    let cases = [
        (Dialect::MySql, "tinyint", "i8"),
        (Dialect::MySql, "smallint", "i16"),
        (Dialect::MySql, "mediumint", "i32"),
        (Dialect::MySql, "int", "i32"),
        (Dialect::MySql, "bigint", "i64"),
        (Dialect::MySql, "float", "f32"),
        (Dialect::MySql, "double precision", "f64"),
        (Dialect::MySql, "decimal", "rust_decimal::Decimal"),
        (Dialect::MySql, "varbinary", "Vec<u8>"),
        (Dialect::MySql, "blob", "Vec<u8>"),
        (Dialect::MySql, "time", "chrono::NaiveTime"),
        (Dialect::MySql, "datetime", "chrono::NaiveDateTime"),
        (Dialect::MySql, "year", "i16"),
        (Dialect::Postgres, "smallserial", "i16"),
        (Dialect::Postgres, "serial", "i32"),
        (Dialect::Postgres, "bigserial", "i64"),
        (Dialect::Postgres, "real", "f32"),
        (Dialect::Postgres, "double precision", "f64"),
        (Dialect::Postgres, "numeric", "rust_decimal::Decimal"),
        (Dialect::Postgres, "character varying", "String"),
        (Dialect::Postgres, "time without time zone", "chrono::NaiveTime"),
        (Dialect::Postgres, "time with time zone", "sqlx::postgres::types::PgTimeTz"),
        (Dialect::Postgres, "timestamp without time zone", "chrono::NaiveDateTime"),
        (Dialect::Postgres, "timestamp with time zone", "chrono::DateTime<chrono::Utc>"),
    ];

    for (dialect, data_type, expected) in cases {
        let database = database(dialect);
        let column = mysql_column(1, "c", data_type, false, "");
        assert_eq!(
            rust_type(&column, &database.describe(&column)),
            expected,
            "{dialect} {data_type}"
        );
    }
}

// =============================================================================
// Template Tests
// =============================================================================

#[test]
fn test_template_renders_struct() {
    let rendered = render_table(&database(Dialect::MySql), &orders(), &options()).unwrap();

    assert_eq!(rendered.table_name, "order_items");
    assert_eq!(rendered.struct_name, "OrderItems");
    assert_eq!(rendered.module_name, "order_items");
    assert_eq!(rendered.file_stem(), "order_items");

    let source = &rendered.source;
    assert!(source.contains("#[derive(Debug, Clone, sqlx::FromRow)]\n"));
    assert!(source.contains("pub struct OrderItems {\n"));
    assert!(source.contains("    /// Primary key, auto increment.\n    pub id: i32,\n"));
    assert!(source.contains("    #[sqlx(rename = \"unitPrice\")]\n    pub unit_price: rust_decimal::Decimal,\n"));
    assert!(source.contains("    #[sqlx(rename = \"type\")]\n    pub r#type: Option<String>,\n"));
    assert!(source.contains("/// Unmapped database type `json`."));
    assert!(source.ends_with("}\n"));
    assert!(!source.contains("serde"));
}

#[test]
fn test_template_keeps_column_order() {
    let rendered = render_table(&database(Dialect::MySql), &orders(), &options()).unwrap();
    let source = &rendered.source;

    let positions: Vec<usize> = ["pub id", "pub unit_price", "pub r#type", "pub note"]
        .iter()
        .map(|field| source.find(field).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_template_without_sqlx_with_serde() {
    let options = RenderOptions {
        sqlx: false,
        serde: true,
        ..Default::default()
    };
    let rendered = render_table(&database(Dialect::MySql), &orders(), &options).unwrap();

    assert!(rendered
        .source
        .contains("#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]"));
    assert!(rendered.source.contains("#[serde(rename = \"unitPrice\")]"));
    assert!(!rendered.source.contains("sqlx"));
}

#[test]
fn test_template_no_rename_when_names_match() {
    let table = Table {
        name: "t".to_string(),
        columns: vec![mysql_column(1, "plain_name", "int", false, "")],
    };
    let rendered = render_table(&database(Dialect::MySql), &table, &options()).unwrap();

    assert!(!rendered.source.contains("rename"));
    assert!(rendered.source.contains("pub plain_name: i32,"));
}

// =============================================================================
// Field Merging Tests
// =============================================================================

fn pg_record(position: i64, name: &str, constraint: Option<(&str, &str)>) -> ColumnRecord {
    ColumnRecord {
        ordinal_position: position,
        column_name: name.to_string(),
        data_type: "integer".to_string(),
        is_nullable: "NO".to_string(),
        key_columns: match constraint {
            Some((name, kind)) => [Some(name.to_string()), Some(kind.to_string())],
            None => [None, None],
        },
        ..Default::default()
    }
}

async fn render_pg(records: Vec<ColumnRecord>) -> anyhow::Result<RenderedTable> {
    let executor = MemoryExecutor::new().with_table("public", "memberships", records);
    let mut database = Database::new(
        driver_for(Dialect::Postgres),
        Arc::new(executor),
        Settings::new(Dialect::Postgres).with_database("shop"),
    );
    let registry = database.load_registry().await?;
    let table = registry
        .get("memberships")
        .context("memberships not reflected")?;
    render_table(&database, table, &options())
}

#[tokio::test]
async fn test_render_merges_rows_of_multi_constraint_column() {
    let rendered = render_pg(vec![
        pg_record(1, "user_id", Some(("memberships_pkey", "PRIMARY KEY"))),
        pg_record(1, "user_id", Some(("memberships_user_id_fkey", "FOREIGN KEY"))),
        pg_record(2, "group_id", Some(("memberships_pkey", "PRIMARY KEY"))),
        pg_record(3, "note_id", None),
    ])
    .await
    .unwrap();
    let source = &rendered.source;

    assert_eq!(source.matches("pub user_id").count(), 1);
    assert!(source.contains("    /// Primary key.\n    pub user_id: i32,\n"));
    assert!(source.contains("    /// Primary key.\n    pub group_id: i32,\n"));
    assert!(source.contains("    pub note_id: i32,\n"));
    assert!(!source.contains("/// Primary key.\n    pub note_id"));
}

#[tokio::test]
async fn test_render_merges_primary_key_reported_after_foreign_key() {
    let rendered = render_pg(vec![
        pg_record(1, "user_id", Some(("memberships_user_id_fkey", "FOREIGN KEY"))),
        pg_record(1, "user_id", Some(("memberships_pkey", "PRIMARY KEY"))),
    ])
    .await
    .unwrap();

    assert_eq!(rendered.source.matches("pub user_id").count(), 1);
    assert!(rendered.source.contains("    /// Primary key.\n    pub user_id: i32,\n"));
}

#[test]
fn test_render_rejects_colliding_field_names() {
    let table = Table {
        name: "accounts".to_string(),
        columns: vec![
            mysql_column(1, "userId", "int", false, ""),
            mysql_column(2, "user_id", "int", false, ""),
        ],
    };

    let error = render_table(&database(Dialect::MySql), &table, &options()).unwrap_err();
    let message = error.to_string();

    assert!(message.contains("'userId'"));
    assert!(message.contains("'user_id'"));
    assert!(message.contains("accounts"));
}

#[test]
fn test_render_rejects_keyword_collision() {
    // `type` and `Type` both become `r#type`
    let table = Table {
        name: "t".to_string(),
        columns: vec![
            mysql_column(1, "type", "int", false, ""),
            mysql_column(2, "Type", "int", false, ""),
        ],
    };

    assert!(render_table(&database(Dialect::MySql), &table, &options()).is_err());
}

#[test]
fn test_template_mod_file_lists_modules() {
    let database = database(Dialect::MySql);
    let registry = TableRegistry::from_tables(vec![
        orders(),
        Table::new("type"),
    ]);
    let rendered = render_registry(&database, &registry, &options()).unwrap();

    let mod_rs = render_mod_file(&rendered);
    assert!(mod_rs.contains("pub mod order_items;\npub mod r#type;\n"));
}

// =============================================================================
// JSON Tests
// =============================================================================

#[test]
fn test_render_json_includes_classification() {
    let database = database(Dialect::MySql);
    let registry = TableRegistry::from_tables(vec![orders()]);

    let json = render_json(&database, &registry).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["dialect"], "mysql");
    assert_eq!(value["schema"], "shop");

    let id = &value["tables"][0]["columns"][0];
    assert_eq!(id["name"], "id");
    assert_eq!(id["category"], "integer");
    assert_eq!(id["traits"]["is_primary_key"], true);
    assert_eq!(id["key_info"]["column_key"], "PRI");

    let payload = &value["tables"][0]["columns"][5];
    assert!(payload["category"].is_null());
}
