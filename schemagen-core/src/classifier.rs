//! Semantic type classification of raw catalog type names.
//!
//! Classification is an exact, case-sensitive membership test against the
//! vocabulary a dialect driver supplies. Nothing is normalized here: the
//! driver is responsible for spelling its vocabulary the way its catalog
//! does. A type missing from every vocabulary belongs to no category and
//! renderers fall back to an opaque field type for it.

use crate::dialects::DialectDriver;
use serde::{Deserialize, Serialize};

/// Semantic type categories a renderer picks field types from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    /// Bounded character and binary strings
    String,
    /// Unbounded text and blobs
    Text,
    Integer,
    /// Floating point and exact numerics
    Float,
    /// Dates, times and timestamps
    Temporal,
}

impl TypeCategory {
    pub const ALL: [TypeCategory; 5] = [
        TypeCategory::String,
        TypeCategory::Text,
        TypeCategory::Integer,
        TypeCategory::Float,
        TypeCategory::Temporal,
    ];
}

impl std::fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeCategory::String => "string",
            TypeCategory::Text => "text",
            TypeCategory::Integer => "integer",
            TypeCategory::Float => "float",
            TypeCategory::Temporal => "temporal",
        };
        f.write_str(name)
    }
}

/// Returns true iff `raw_type` is an exact member of `vocabulary`.
///
/// # Example
/// ```rust
/// use schemagen_core::classifier::classify;
///
/// assert!(classify("varchar", &["char", "varchar"]));
/// assert!(!classify("VARCHAR", &["char", "varchar"]));
/// assert!(!classify(" varchar", &["char", "varchar"]));
/// ```
pub fn classify(raw_type: &str, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|candidate| *candidate == raw_type)
}

/// Returns the first category whose vocabulary contains `raw_type`.
pub fn categorize(raw_type: &str, driver: &dyn DialectDriver) -> Option<TypeCategory> {
    TypeCategory::ALL
        .into_iter()
        .find(|category| classify(raw_type, driver.vocabulary(*category)))
}
