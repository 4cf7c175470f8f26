//! Reading and writing snapshot documents.

use std::path::Path;

use tessera_core::{SnapshotError, TokenSnapshot};

use crate::error::Result;

/// Load a snapshot document from disk.
///
/// The document is parsed and fully validated; a tampered or truncated
/// file never yields a snapshot.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<TokenSnapshot> {
    let document = std::fs::read_to_string(path)?;
    Ok(TokenSnapshot::from_json(&document)?)
}

/// Write a snapshot document to disk.
///
/// Writes a sibling temp file and renames it over the target, so a
/// crash mid-write never leaves a truncated document behind.
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &TokenSnapshot) -> Result<()> {
    let path = path.as_ref();
    let document = snapshot.to_json_pretty().map_err(SnapshotError::from)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, document)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
