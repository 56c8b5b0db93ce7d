//! File output for generated code.
//!
//! Rust output is one module per table plus a `mod.rs` declaring them all;
//! JSON output is a single `schema.json`. The output directory is created
//! when missing and existing files are overwritten.

use crate::render::{RenderedTable, render_mod_file};
use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name of the JSON dump.
pub const JSON_FILE_NAME: &str = "schema.json";

async fn ensure_dir(output_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create directory {}", output_dir.display()))
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    tracing::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Writes one `<module>.rs` per table and the `mod.rs` listing them.
///
/// Returns the written paths, `mod.rs` last.
///
/// # Errors
/// Returns error if two tables map to the same module name or a file
/// cannot be written
pub async fn write_rust_modules(
    output_dir: &Path,
    tables: &[RenderedTable],
) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    for table in tables {
        if !seen.insert(table.file_stem()) {
            bail!(
                "Table '{}' maps to module '{}', which is already taken",
                table.table_name,
                table.file_stem()
            );
        }
    }

    ensure_dir(output_dir).await?;

    let mut written = Vec::with_capacity(tables.len() + 1);
    for table in tables {
        let path = output_dir.join(format!("{}.rs", table.file_stem()));
        write_file(&path, &table.source).await?;
        written.push(path);
    }

    let mod_path = output_dir.join("mod.rs");
    write_file(&mod_path, &render_mod_file(tables)).await?;
    written.push(mod_path);

    Ok(written)
}

/// Writes the JSON dump to `<output_dir>/schema.json`.
///
/// # Errors
/// Returns error if the file cannot be written
pub async fn write_json(output_dir: &Path, json: &str) -> Result<PathBuf> {
    ensure_dir(output_dir).await?;

    let path = output_dir.join(JSON_FILE_NAME);
    write_file(&path, json).await?;

    Ok(path)
}
