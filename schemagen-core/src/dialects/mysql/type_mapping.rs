//! MySQL type-name vocabulary.
//!
//! Spellings match `information_schema.columns.data_type`, which MySQL
//! reports in lowercase and without width or `unsigned` modifiers.

use crate::classifier::TypeCategory;

pub const STRING_TYPES: &[&str] = &["char", "varchar", "binary", "varbinary"];

pub const TEXT_TYPES: &[&str] = &["text", "blob"];

pub const INTEGER_TYPES: &[&str] = &["tinyint", "smallint", "mediumint", "int", "bigint"];

pub const FLOAT_TYPES: &[&str] = &["numeric", "decimal", "float", "real", "double precision"];

pub const TEMPORAL_TYPES: &[&str] = &["time", "timestamp", "date", "datetime", "year"];

/// Returns the MySQL spellings for `category`.
///
/// # Example
/// ```rust
/// use schemagen_core::classifier::TypeCategory;
/// use schemagen_core::dialects::mysql::type_mapping::vocabulary;
///
/// assert!(vocabulary(TypeCategory::Integer).contains(&"mediumint"));
/// ```
pub fn vocabulary(category: TypeCategory) -> &'static [&'static str] {
    match category {
        TypeCategory::String => STRING_TYPES,
        TypeCategory::Text => TEXT_TYPES,
        TypeCategory::Integer => INTEGER_TYPES,
        TypeCategory::Float => FLOAT_TYPES,
        TypeCategory::Temporal => TEMPORAL_TYPES,
    }
}
