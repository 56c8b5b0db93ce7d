//! Connection settings for one generation run.
//!
//! `Settings` is built once (usually from CLI flags), validated, and then
//! only read: it feeds DSN construction and every catalog query. The schema
//! filter differs per dialect, see [`Settings::catalog_schema`].

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    Postgres,
}

impl Dialect {
    /// Every dialect with a driver, in display order.
    pub const ALL: [Dialect; 2] = [Dialect::MySql, Dialect::Postgres];

    /// Default TCP port of the database server.
    pub fn default_port(self) -> u16 {
        match self {
            Dialect::MySql => 3306,
            Dialect::Postgres => 5432,
        }
    }

    /// Short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "pg",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = crate::SchemaGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "pg" | "postgres" | "postgresql" => Ok(Dialect::Postgres),
            _ => Err(crate::SchemaGenError::unsupported_dialect(s)),
        }
    }
}

/// Connection settings.
///
/// The password is kept in a [`Zeroizing`] buffer and never shows up in
/// `Debug` or `Display` output.
///
/// # Example
/// ```rust
/// use schemagen_core::settings::{Dialect, Settings};
///
/// let settings = Settings::new(Dialect::Postgres)
///     .with_host("db")
///     .with_database("app")
///     .with_user("u")
///     .with_password("p");
///
/// assert_eq!(settings.port, 5432);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    pub dialect: Dialect,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip)]
    pub password: Zeroizing<String>,
    pub db_name: String,
    pub schema: String,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Dialect::Postgres)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("dialect", &self.dialect)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("db_name", &self.db_name)
            .field("schema", &self.schema)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Intentionally omit user and password
        write!(
            f,
            "{}://{}:{}/{}",
            self.dialect, self.host, self.port, self.db_name
        )?;
        if self.dialect == Dialect::Postgres {
            write!(f, " (schema {})", self.schema)?;
        }
        Ok(())
    }
}

impl Settings {
    /// Creates settings for `dialect` with local defaults.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            host: "127.0.0.1".to_string(),
            port: dialect.default_port(),
            user: "postgres".to_string(),
            password: Zeroizing::new(String::new()),
            db_name: String::new(),
            schema: "public".to_string(),
            verbose: false,
        }
    }

    /// Builder method to set host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Builder method to set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Builder method to set password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(password.into());
        self
    }

    /// Builder method to set database name.
    pub fn with_database(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Builder method to set schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Builder method to toggle verbose diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Password as plain text, for DSN construction only.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Value bound as the schema filter of every catalog query.
    ///
    /// MySQL calls databases schemas, so it filters on `db_name`;
    /// PostgreSQL filters on `schema`.
    pub fn catalog_schema(&self) -> &str {
        match self.dialect {
            Dialect::MySql => &self.db_name,
            Dialect::Postgres => &self.schema,
        }
    }

    /// Validates settings before any connection is attempted.
    ///
    /// # Errors
    /// Returns a configuration error naming the first invalid field
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.is_empty() {
            return Err(crate::SchemaGenError::configuration("host cannot be empty"));
        }

        if self.port == 0 {
            return Err(crate::SchemaGenError::configuration(
                "port must be greater than 0",
            ));
        }

        if self.user.is_empty() {
            return Err(crate::SchemaGenError::configuration("user cannot be empty"));
        }

        if self.db_name.is_empty() {
            return Err(crate::SchemaGenError::configuration(
                "database name cannot be empty",
            ));
        }

        if self.dialect == Dialect::Postgres && self.schema.is_empty() {
            return Err(crate::SchemaGenError::configuration(
                "schema cannot be empty for PostgreSQL",
            ));
        }

        Ok(())
    }
}
