// src/file.rs

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::config::options::ExportOptions;
use crate::csv::to_delimited_string;
use crate::error::Result;
use crate::record::{ProductRecord, EXPORT_HEADERS};

/// Write the enriched table where `ExportOptions` points (path, headers policy,
/// delimiter). Returns the final path written to.
pub fn write_enriched(export: &ExportOptions, records: &[ProductRecord]) -> Result<PathBuf> {
    let path = export.out_path();
    ensure_parent(&path)?;

    let rows: Vec<Vec<String>> = records.iter().map(ProductRecord::to_row).collect();
    let headers = export.include_headers.then_some(&EXPORT_HEADERS[..]);
    let contents = to_delimited_string(headers, &rows, export.delim());

    fs::write(&path, contents)?;
    logf!("Wrote {} enriched records to {}", records.len(), path.display());
    Ok(path)
}

/// Plain-text report, created or truncated.
pub fn write_report(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, text)?;
    logf!("Wrote report to {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        )
        .into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
