//! Catalog reflection for schemagen.
//!
//! This crate reads a relational database's catalog (tables, columns,
//! types, keys) and exposes it through one dialect-agnostic facade so code
//! generators never deal with per-dialect catalog queries or type
//! spellings.
//!
//! # Architecture
//! - [`dialects::DialectDriver`]: one implementation per SQL dialect
//!   (MySQL, PostgreSQL) holding catalog queries, DSN format, key
//!   predicates, and type vocabularies
//! - [`executor::CatalogExecutor`]: the injected SQL handle (sqlx pools in
//!   production, [`memory::MemoryExecutor`] in tests)
//! - [`Database`]: the facade wrapping one driver and one executor
//! - [`classifier`]: exact-membership type classification
//!
//! All catalog access is read-only and every filter is a bound parameter.
//!
//! # Example
//! ```rust
//! use schemagen_core::{Database, dialects::driver_for, memory::MemoryExecutor};
//! use schemagen_core::settings::{Dialect, Settings};
//! use std::sync::Arc;
//!
//! let settings = Settings::new(Dialect::Postgres)
//!     .with_host("db")
//!     .with_user("u")
//!     .with_database("app")
//!     .with_password("p");
//! let database = Database::new(
//!     driver_for(Dialect::Postgres),
//!     Arc::new(MemoryExecutor::new()),
//!     settings,
//! );
//!
//! assert_eq!(
//!     database.data_source_name(),
//!     "host=db port=5432 user=u dbname=app password=p sslmode=disable"
//! );
//! ```

pub mod classifier;
pub mod database;
pub mod dialects;
pub mod error;
pub mod executor;
pub mod logging;
pub mod memory;
pub mod models;
pub mod settings;

// Re-export commonly used types
pub use classifier::TypeCategory;
pub use database::{ColumnTraits, Database};
pub use dialects::{DialectDriver, MySqlDriver, PostgresDriver, driver_for};
pub use error::{Result, SchemaGenError};
pub use executor::{CatalogExecutor, ColumnRecord, PreparedStatement};
pub use logging::init_logging;
pub use models::{Column, DialectKeyInfo, Table, TableRegistry};
pub use settings::{Dialect, Settings};
