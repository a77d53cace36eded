//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};
use tracing::{debug, warn};

use crate::cli::GlobalOpts;
use crate::core::{Config, Store};

/// Open the store selected by `--db`, the environment or the config file
pub fn open_store(global: &GlobalOpts) -> Result<Store> {
    let config = Config {
        database: global.db.clone(),
        ..Config::default()
    };
    let path = config.database_path();
    if config.is_in_memory() {
        warn!("in-memory catalog: nothing is kept after invcat exits");
    }
    debug!(path = %path.display(), "opening catalog store");
    Store::open(&path).into_diagnostic()
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a comma-separated list of ids
///
/// Parsed as a single CSV record, so quoted values and surrounding whitespace
/// are handled. Empty entries are dropped.
pub fn parse_id_list(input: &str) -> Result<Vec<String>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut ids = Vec::new();
    for record in reader.records() {
        let record = record.into_diagnostic()?;
        ids.extend(
            record
                .iter()
                .filter(|field| !field.is_empty())
                .map(String::from),
        );
    }
    Ok(ids)
}

/// Collect ids from repeated and/or comma-separated flag values
pub fn collect_ids(values: &[String]) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for value in values {
        ids.extend(parse_id_list(value)?);
    }
    Ok(ids)
}
