//! Rendering of reflected tables into Rust source or JSON.
//!
//! Type selection starts from the semantic category the facade assigns and
//! narrows it by the raw spelling, so every field type is one sqlx decodes
//! for that column.

use anyhow::{Context, Result, bail};
use askama::Template;
use schemagen_core::{Column, ColumnTraits, Database, Table, TableRegistry, TypeCategory};
use serde::Serialize;
use std::collections::HashMap;

/// Identifiers that need a raw `r#` prefix to be used as names.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers; these get a trailing underscore.
const PLAIN_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Naming and tagging options for generated structs.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Prepended to every struct name
    pub prefix: String,
    /// Appended to every struct name
    pub suffix: String,
    /// Derive `sqlx::FromRow` and emit `#[sqlx(rename)]` where needed
    pub sqlx: bool,
    /// Derive serde traits and emit `#[serde(rename)]` where needed
    pub serde: bool,
}

/// One generated Rust module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    /// Table name as reported by the catalog
    pub table_name: String,
    /// Module identifier as written in `mod.rs` (may be raw)
    pub module_name: String,
    pub struct_name: String,
    /// Rendered module source, newline terminated
    pub source: String,
}

impl RenderedTable {
    /// File stem of the module, without any `r#` prefix.
    pub fn file_stem(&self) -> &str {
        unraw(&self.module_name)
    }
}

/// One struct field: a catalog column with its merged key traits.
///
/// PostgreSQL reports a column once per constraint on it (a junction
/// table's key column is both primary and foreign key), so rows sharing an
/// ordinal position are folded into one field.
struct MergedColumn<'a> {
    column: &'a Column,
    traits: ColumnTraits,
}

struct FieldView {
    name: String,
    ty: String,
    docs: Vec<String>,
    attrs: Vec<String>,
}

#[derive(Template)]
#[template(path = "table.rs.txt", escape = "none")]
struct TableTemplate<'a> {
    table_name: &'a str,
    struct_name: &'a str,
    derives: String,
    fields: Vec<FieldView>,
}

fn base_type(category: Option<TypeCategory>, data_type: &str) -> &'static str {
    use TypeCategory::{Float, Integer, String, Temporal, Text};

    match (category, data_type) {
        (Some(String | Text), "binary" | "varbinary" | "blob") => "Vec<u8>",
        (Some(String | Text), _) => "String",
        (Some(Integer), "tinyint") => "i8",
        (Some(Integer), "smallint" | "smallserial") => "i16",
        (Some(Integer), "mediumint" | "int" | "integer" | "serial") => "i32",
        (Some(Integer), _) => "i64",
        (Some(Float), "numeric" | "decimal") => "rust_decimal::Decimal",
        (Some(Float), "float" | "real") => "f32",
        (Some(Float), _) => "f64",
        (Some(Temporal), "date") => "chrono::NaiveDate",
        (Some(Temporal), "time" | "time without time zone") => "chrono::NaiveTime",
        (Some(Temporal), "time with time zone") => "sqlx::postgres::types::PgTimeTz",
        (Some(Temporal), "timestamp with time zone") => "chrono::DateTime<chrono::Utc>",
        (Some(Temporal), "year") => "i16",
        (Some(Temporal), _) => "chrono::NaiveDateTime",
        (None, _) => "Vec<u8>",
    }
}

/// Rust type for a column with the given traits.
///
/// Widths follow the column: `integer` is `i32`, `real` is `f32`, exact
/// numerics are `rust_decimal::Decimal`. Unknown types fall back to
/// `Vec<u8>`.
pub fn rust_type(column: &Column, traits: &ColumnTraits) -> String {
    let base = base_type(traits.category(), &column.data_type);

    if traits.is_nullable {
        format!("Option<{}>", base)
    } else {
        base.to_string()
    }
}

/// Splits an identifier into lowercase words.
///
/// Boundaries are non-alphanumeric characters, lower-to-upper transitions,
/// and the last capital of an acronym (`HTTPServer` is `http`, `server`).
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `user_accounts` becomes `UserAccounts`.
pub fn upper_camel(name: &str) -> String {
    words(name)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// `UserAccounts` becomes `user_accounts`.
pub fn snake_case(name: &str) -> String {
    words(name).join("_")
}

/// Makes `name` a valid Rust identifier.
fn escape_identifier(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else if RAW_KEYWORDS.contains(&name.as_str()) {
        format!("r#{}", name)
    } else if PLAIN_KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

/// Struct name: prefix + UpperCamelCase(table) + suffix.
pub fn struct_name(table: &str, options: &RenderOptions) -> String {
    let name = format!("{}{}{}", options.prefix, upper_camel(table), options.suffix);
    if name.is_empty() {
        return "Table_".to_string();
    }
    escape_identifier(name)
}

/// Field name: snake_case(column), escaped.
pub fn field_name(column: &Column) -> String {
    let name = snake_case(&column.name);
    if name.is_empty() {
        return format!("column_{}", column.ordinal_position);
    }
    escape_identifier(name)
}

fn module_name(table: &str) -> String {
    let name = snake_case(table);
    if name.is_empty() {
        return "table_".to_string();
    }
    escape_identifier(name)
}

/// Folds rows sharing an ordinal position; the field is a primary key (or
/// auto increment) if any of its rows says so.
fn merge_columns<'a>(database: &Database, table: &'a Table) -> Vec<MergedColumn<'a>> {
    let mut merged: Vec<MergedColumn<'a>> = Vec::with_capacity(table.columns.len());

    for column in &table.columns {
        let traits = database.describe(column);
        match merged
            .iter_mut()
            .find(|m| m.column.ordinal_position == column.ordinal_position)
        {
            Some(existing) => {
                existing.traits.is_primary_key |= traits.is_primary_key;
                existing.traits.is_auto_increment |= traits.is_auto_increment;
            }
            None => merged.push(MergedColumn { column, traits }),
        }
    }

    merged
}

fn field_view(merged: &MergedColumn<'_>, options: &RenderOptions) -> FieldView {
    let MergedColumn { column, traits } = merged;
    let name = field_name(column);

    let mut docs = Vec::new();
    match (traits.is_primary_key, traits.is_auto_increment) {
        (true, true) => docs.push("Primary key, auto increment.".to_string()),
        (true, false) => docs.push("Primary key.".to_string()),
        (false, true) => docs.push("Auto increment.".to_string()),
        (false, false) => {}
    }
    if traits.category().is_none() {
        docs.push(format!("Unmapped database type `{}`.", column.data_type));
    }

    // Raw identifiers are renamed explicitly too
    let mut attrs = Vec::new();
    if name != column.name {
        if options.sqlx {
            attrs.push(format!("#[sqlx(rename = {:?})]", column.name));
        }
        if options.serde {
            attrs.push(format!("#[serde(rename = {:?})]", column.name));
        }
    }

    FieldView {
        ty: rust_type(column, traits),
        name,
        docs,
        attrs,
    }
}

fn derives(options: &RenderOptions) -> String {
    let mut derives = vec!["Debug", "Clone"];
    if options.sqlx {
        derives.push("sqlx::FromRow");
    }
    if options.serde {
        derives.push("serde::Serialize");
        derives.push("serde::Deserialize");
    }
    derives.join(", ")
}

/// Renders one table as a Rust module.
///
/// # Errors
/// Returns error if two columns map to the same field name or the template
/// fails to render
pub fn render_table(
    database: &Database,
    table: &Table,
    options: &RenderOptions,
) -> Result<RenderedTable> {
    let mut fields = Vec::with_capacity(table.columns.len());
    let mut taken: HashMap<String, &str> = HashMap::new();

    for merged in merge_columns(database, table) {
        let column = merged.column;
        let view = field_view(&merged, options);
        if let Some(other) = taken.insert(view.name.clone(), column.name.as_str()) {
            bail!(
                "Columns '{}' and '{}' of table '{}' both map to field '{}'",
                other,
                column.name,
                table.name,
                view.name
            );
        }
        fields.push(view);
    }

    let struct_name = struct_name(&table.name, options);
    let template = TableTemplate {
        table_name: &table.name,
        struct_name: &struct_name,
        derives: derives(options),
        fields,
    };

    let mut source = template
        .render()
        .with_context(|| format!("Failed to render table '{}'", table.name))?;
    if !source.ends_with('\n') {
        source.push('\n');
    }

    tracing::debug!("Rendered table '{}' as {}", table.name, struct_name);

    Ok(RenderedTable {
        table_name: table.name.clone(),
        module_name: module_name(&table.name),
        struct_name,
        source,
    })
}

/// Renders every table of the registry, in registry order.
///
/// # Errors
/// Returns the first rendering error
pub fn render_registry(
    database: &Database,
    registry: &TableRegistry,
    options: &RenderOptions,
) -> Result<Vec<RenderedTable>> {
    registry
        .iter()
        .map(|table| render_table(database, table, options))
        .collect()
}

/// Contents of `mod.rs` declaring every rendered module.
pub fn render_mod_file(tables: &[RenderedTable]) -> String {
    let mut source = String::from("// Code generated by schemagen. DO NOT EDIT.\n\n");
    for table in tables {
        source.push_str(&format!("pub mod {};\n", table.module_name));
    }
    source
}

#[derive(Serialize)]
struct ColumnDump<'a> {
    #[serde(flatten)]
    column: &'a Column,
    category: Option<TypeCategory>,
    traits: ColumnTraits,
}

#[derive(Serialize)]
struct TableDump<'a> {
    name: &'a str,
    columns: Vec<ColumnDump<'a>>,
}

#[derive(Serialize)]
struct SchemaDump<'a> {
    dialect: String,
    schema: &'a str,
    tables: Vec<TableDump<'a>>,
}

/// Pretty JSON dump of the registry with each column's classification.
///
/// # Errors
/// Returns error if serialization fails
pub fn render_json(database: &Database, registry: &TableRegistry) -> Result<String> {
    let dump = SchemaDump {
        dialect: database.dialect().to_string(),
        schema: database.settings().catalog_schema(),
        tables: registry
            .iter()
            .map(|table| TableDump {
                name: &table.name,
                columns: table
                    .columns
                    .iter()
                    .map(|column| ColumnDump {
                        column,
                        category: database.category(column),
                        traits: database.describe(column),
                    })
                    .collect(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&dump).context("Failed to serialize schema to JSON")
}

#[cfg(test)]
mod tests;
