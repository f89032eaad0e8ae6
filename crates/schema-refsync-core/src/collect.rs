//! Reference collection from the base schema.
//!
//! Builds the [`RefMap`]: for each requested definition name that the base
//! document also defines with a string `$ref`, record `name → $ref`. Names
//! the base does not define, or defines without a usable `$ref`, are skipped.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::document::{SchemaDocument, REF_KEY};
use crate::error::SyncError;

/// Definition name → reference string taken from the base schema.
pub type RefMap = BTreeMap<String, String>;

/// Read the base schema at `base_path` and collect `$ref` values for `keys`.
pub fn collect_refs<S: AsRef<str>>(
    keys: &[S],
    base_path: impl AsRef<Path>,
) -> Result<RefMap, SyncError> {
    let base = SchemaDocument::load(base_path)?;
    let refs = refs_for_keys(keys, &base)?;
    tracing::debug!(
        path = %base.path().display(),
        requested = keys.len(),
        found = refs.len(),
        "collected base references"
    );
    Ok(refs)
}

/// Collect `$ref` values for `keys` from an already-loaded base document.
pub fn refs_for_keys<S: AsRef<str>>(
    keys: &[S],
    base: &SchemaDocument,
) -> Result<RefMap, SyncError> {
    let defs = base.defs()?;
    let mut refs = RefMap::new();

    for key in keys {
        let key = key.as_ref();
        let Some(def) = defs.get(key) else {
            tracing::debug!(key, "definition absent from base, skipping");
            continue;
        };
        match def.get(REF_KEY).and_then(Value::as_str) {
            Some(reference) => {
                refs.insert(key.to_string(), reference.to_string());
            }
            None => {
                tracing::debug!(key, "base definition has no string $ref, skipping");
            }
        }
    }

    Ok(refs)
}
