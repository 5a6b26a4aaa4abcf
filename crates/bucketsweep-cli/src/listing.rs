//! Offline bucket listings
//!
//! A listing is either a JSON array of objects or NDJSON with one object
//! per line. `-` reads from standard input.

use bucketsweep_core::{Error, Result, StorageObject};
use std::io::Read;
use tracing::debug;

/// Read a listing from a file path or `-` for stdin
pub fn load_listing(source: &str) -> Result<Vec<StorageObject>> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| Error::listing(format!("failed to read {}: {}", source, e)))?
    };

    let objects = parse_listing(&content)?;
    debug!(source, objects = objects.len(), "Listing loaded");
    Ok(objects)
}

/// Parse a JSON array or NDJSON listing
pub fn parse_listing(content: &str) -> Result<Vec<StorageObject>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| Error::listing(format!("invalid JSON listing: {}", e)));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::listing(format!("line {}: {}", index + 1, e)))
        })
        .collect()
}
