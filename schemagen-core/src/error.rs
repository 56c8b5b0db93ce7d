//! Error types for catalog reflection.
//!
//! Errors carry the schema and table being reflected so a failed run can be
//! diagnosed without re-running it. Passwords never appear in error output;
//! connection strings must go through [`redact_password`] before being
//! attached to any context.

use thiserror::Error;

/// Boxed source error shared by the variants below.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for schemagen operations.
#[derive(Debug, Error)]
pub enum SchemaGenError {
    /// A catalog query failed
    #[error("{}", query_message(.schema, .table.as_deref()))]
    Query {
        schema: String,
        table: Option<String>,
        #[source]
        source: BoxError,
    },

    /// Compiling the columns statement failed
    #[error("Failed to prepare columns statement")]
    Prepare {
        #[source]
        source: BoxError,
    },

    /// Columns were requested before the statement was prepared
    #[error("Columns statement has not been prepared")]
    StatementNotPrepared,

    /// Database connection failed (credentials sanitized)
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Dialect name is unknown or its driver was not compiled in
    #[error("Unsupported dialect: {dialect}")]
    UnsupportedDialect { dialect: String },

    /// A catalog row could not be decoded
    #[error("Failed to decode field '{field}' from catalog row")]
    Decode {
        field: String,
        #[source]
        source: BoxError,
    },
}

fn query_message(schema: &str, table: Option<&str>) -> String {
    match table {
        Some(table) => format!(
            "Catalog query failed for table '{}' in schema '{}'",
            table, schema
        ),
        None => format!("Catalog query failed for schema '{}'", schema),
    }
}

/// Convenience type alias for Results with SchemaGenError
pub type Result<T> = std::result::Result<T, SchemaGenError>;

/// Masks every occurrence of `password` inside `dsn` with `****`.
///
/// Both DSN shapes embed the password verbatim (`user:pass@tcp(..)` and
/// `password=pass`), so a plain substring replacement is enough.
///
/// # Example
///
/// ```rust
/// use schemagen_core::error::redact_password;
///
/// let dsn = "host=db port=5432 user=u dbname=app password=secret sslmode=disable";
/// let redacted = redact_password(dsn, "secret");
/// assert_eq!(
///     redacted,
///     "host=db port=5432 user=u dbname=app password=**** sslmode=disable"
/// );
/// ```
pub fn redact_password(dsn: &str, password: &str) -> String {
    if password.is_empty() {
        return dsn.to_string();
    }
    dsn.replace(password, "****")
}

impl SchemaGenError {
    /// Creates a query error for a schema-level catalog query
    pub fn query_failed<E>(schema: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            schema: schema.into(),
            table: None,
            source: Box::new(error),
        }
    }

    /// Creates a query error for a per-table catalog query
    pub fn table_query_failed<E>(
        schema: impl Into<String>,
        table: impl Into<String>,
        error: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            schema: schema.into(),
            table: Some(table.into()),
            source: Box::new(error),
        }
    }

    /// Creates a statement preparation error
    pub fn prepare_failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Prepare {
            source: Box::new(error),
        }
    }

    /// Creates a connection error with sanitized context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a decoding error for a catalog row field
    pub fn decode_failed<E>(field: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            field: field.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unsupported dialect error
    pub fn unsupported_dialect(dialect: impl Into<String>) -> Self {
        Self::UnsupportedDialect {
            dialect: dialect.into(),
        }
    }

    /// Re-targets a query error at another schema/table.
    ///
    /// Executors do not know which schema a statement filters on; drivers
    /// use this to attach it. Other variants pass through unchanged.
    pub(crate) fn in_context(self, schema: &str, table: Option<&str>) -> Self {
        match self {
            Self::Query { source, .. } => Self::Query {
                schema: schema.to_string(),
                table: table.map(str::to_string),
                source,
            },
            other => other,
        }
    }
}
