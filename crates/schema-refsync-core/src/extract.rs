//! Definition key extraction from the derived schema.

use std::path::Path;

use crate::document::SchemaDocument;
use crate::error::SyncError;

/// Read the derived schema at `path` and return the names under its `$defs`.
///
/// Fails if the file cannot be read, is not valid JSON, or lacks a `$defs`
/// object.
pub fn extract_keys(path: impl AsRef<Path>) -> Result<Vec<String>, SyncError> {
    let doc = SchemaDocument::load(path)?;
    let keys = definition_keys(&doc)?;
    tracing::debug!(
        path = %doc.path().display(),
        count = keys.len(),
        "extracted definition keys"
    );
    Ok(keys)
}

/// The names under a document's `$defs` object, in sorted order.
pub fn definition_keys(doc: &SchemaDocument) -> Result<Vec<String>, SyncError> {
    Ok(doc.defs()?.keys().cloned().collect())
}
