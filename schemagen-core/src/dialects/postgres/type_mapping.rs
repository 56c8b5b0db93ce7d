//! PostgreSQL type-name vocabulary.
//!
//! Spellings match `information_schema.columns.data_type`, which uses the
//! SQL-standard long names (`character varying`, `timestamp with time
//! zone`). Short aliases are listed too where the catalog can report them.

use crate::classifier::TypeCategory;

pub const STRING_TYPES: &[&str] = &["character varying", "varchar", "character", "char"];

pub const TEXT_TYPES: &[&str] = &["text"];

pub const INTEGER_TYPES: &[&str] = &[
    "smallint",
    "integer",
    "bigint",
    "smallserial",
    "serial",
    "bigserial",
];

pub const FLOAT_TYPES: &[&str] = &["numeric", "decimal", "real", "double precision"];

pub const TEMPORAL_TYPES: &[&str] = &[
    "time",
    "timestamp",
    "time with time zone",
    "timestamp with time zone",
    "time without time zone",
    "timestamp without time zone",
    "date",
];

/// Returns the PostgreSQL spellings for `category`.
pub fn vocabulary(category: TypeCategory) -> &'static [&'static str] {
    match category {
        TypeCategory::String => STRING_TYPES,
        TypeCategory::Text => TEXT_TYPES,
        TypeCategory::Integer => INTEGER_TYPES,
        TypeCategory::Float => FLOAT_TYPES,
        TypeCategory::Temporal => TEMPORAL_TYPES,
    }
}
