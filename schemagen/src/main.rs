//! Rust struct generator for MySQL and PostgreSQL schemas.
//!
//! Reflects the base tables of one schema through the read-only catalog
//! facade and writes one Rust module per table, or a JSON dump of the
//! classified catalog.
//!
//! # Security Guarantees
//! - Read-only catalog queries only
//! - Passwords are never logged; prefer the environment variable or the
//!   interactive prompt over the command line

mod output;
mod render;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use render::RenderOptions;
use schemagen_core::{Database, Dialect, Settings, init_logging};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "schemagen")]
#[command(about = "Generate Rust structs from database tables")]
#[command(version)]
#[command(disable_help_flag = true)]
#[command(long_about = "
schemagen - Rust structs from database catalogs

Reads the base tables of one schema from information_schema and writes a
Rust struct per table, with optional sqlx and serde attributes.

SUPPORTED DATABASES:
- MySQL (-t mysql)
- PostgreSQL (-t pg)

EXAMPLES:
  schemagen -t pg -h localhost -u app -d shop -s public -o src/models
  schemagen -t mysql -u root -d shop --serde --prefix Db
  SCHEMAGEN_PASSWORD=secret schemagen -d shop --format json
")]
pub struct Cli {
    /// Database dialect
    #[arg(short = 't', long = "type", default_value = "pg", help = "Database type (mysql, pg)")]
    pub dialect: Dialect,

    /// Database host
    #[arg(short = 'h', long, help = "Host of the database")]
    pub host: Option<String>,

    /// Database port
    #[arg(short, long, help = "Port of the database (default: dialect's port)")]
    pub port: Option<u16>,

    /// Database user
    #[arg(short, long, help = "User to connect to the database")]
    pub user: Option<String>,

    /// Database password
    #[arg(
        long,
        env = "SCHEMAGEN_PASSWORD",
        hide_env_values = true,
        help = "Password of the user (never logged)"
    )]
    pub password: Option<String>,

    /// Prompt for the password
    #[arg(long, conflicts_with = "password", help = "Read the password from the terminal")]
    pub prompt_password: bool,

    /// Database name
    #[arg(short, long = "database", help = "Database name")]
    pub db_name: String,

    /// Schema name
    #[arg(short, long, help = "Schema name (PostgreSQL only)")]
    pub schema: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "output", help = "Output directory")]
    pub output: PathBuf,

    /// Struct name prefix
    #[arg(long, default_value = "", help = "Prefix for struct names")]
    pub prefix: String,

    /// Struct name suffix
    #[arg(long, default_value = "", help = "Suffix for struct names")]
    pub suffix: String,

    /// Skip sqlx attributes
    #[arg(long, help = "Do not derive sqlx::FromRow")]
    pub no_sqlx: bool,

    /// Add serde attributes
    #[arg(long, help = "Derive serde::Serialize and serde::Deserialize")]
    pub serde: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Rust)]
    pub format: OutputFormat,

    /// Increase verbosity
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help, help = "Print help")]
    pub help: Option<bool>,
}

/// Available output formats
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One Rust module per table
    Rust,
    /// Classified catalog as JSON
    Json,
}

impl Cli {
    /// Builds connection settings; unset flags keep the dialect defaults.
    fn settings(&self, password: Option<String>) -> Settings {
        let mut settings = Settings::new(self.dialect)
            .with_database(self.db_name.clone())
            .with_verbose(self.verbose > 0);

        if let Some(host) = &self.host {
            settings = settings.with_host(host.clone());
        }
        if let Some(port) = self.port {
            settings = settings.with_port(port);
        }
        if let Some(user) = &self.user {
            settings = settings.with_user(user.clone());
        }
        if let Some(schema) = &self.schema {
            settings = settings.with_schema(schema.clone());
        }
        if let Some(password) = password {
            settings = settings.with_password(password);
        }

        settings
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            sqlx: !self.no_sqlx,
            serde: self.serde,
        }
    }

    fn password(&self) -> Result<Option<String>> {
        if self.prompt_password {
            let password =
                rpassword::prompt_password("Password: ").context("Failed to read password")?;
            return Ok(Some(password));
        }
        Ok(self.password.clone())
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let settings = cli.settings(cli.password()?);
    settings.validate()?;

    let database = Database::open(settings).await?;
    info!("Connecting to {}", database.redacted_data_source_name());

    generate(cli, database).await
}

/// Runs one generation and closes the database whether or not it succeeded.
async fn generate(cli: &Cli, mut database: Database) -> Result<()> {
    let result = write_output(cli, &mut database).await;
    database.close().await;
    result
}

async fn write_output(cli: &Cli, database: &mut Database) -> Result<()> {
    let registry = database.load_registry().await?;

    match cli.format {
        OutputFormat::Rust => {
            let rendered = render::render_registry(database, &registry, &cli.render_options())?;
            let written = output::write_rust_modules(&cli.output, &rendered).await?;
            info!(
                "Generated {} modules in {}",
                rendered.len(),
                cli.output.display()
            );
            tracing::debug!("Files written: {:?}", written);
        }
        OutputFormat::Json => {
            let json = render::render_json(database, &registry)?;
            let path = output::write_json(&cli.output, &json).await?;
            info!("Schema written to {}", path.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet)?;

    run(&cli).await.inspect_err(|e| {
        tracing::error!("Generation failed: {:#}", e);
    })
}
