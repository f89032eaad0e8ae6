//! Reference rewriting in the derived schema.
//!
//! Walks `$defs` depth-first. When an object key is in the [`RefMap`], its
//! value is the target definition: an existing `$ref` there is overwritten
//! with the mapped reference and the walk does not descend further into it.
//! Keys not in the map are descended into. Arrays are walked element-wise.
//!
//! Because matched subtrees are never entered, a nested key that shares a
//! mapped name under an already-matched key is left alone (outer match wins).

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::collect::RefMap;
use crate::config::SyncOptions;
use crate::document::{build_path, SchemaDocument, DEFS_KEY, REF_KEY};
use crate::error::SyncError;

/// One overwritten `$ref`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefUpdate {
    /// The matched definition name.
    pub key: String,
    /// JSON Pointer of the updated object (e.g. `#/$defs/Foo`).
    pub pointer: String,
    /// The `$ref` value before the update. Not necessarily a string.
    pub previous: Value,
    /// The reference copied from the base schema.
    pub new_ref: String,
}

impl fmt::Display for RefUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Updating $ref for key: {} -> {}", self.key, self.new_ref)
    }
}

/// Rewrite `$ref` values in the derived schema at `path` and save it.
///
/// The file is read fresh. With `options.dry_run` the updates are computed
/// and returned but nothing is written.
pub fn rewrite_refs(
    path: impl AsRef<Path>,
    refs: &RefMap,
    options: &SyncOptions,
) -> Result<Vec<RefUpdate>, SyncError> {
    rewrite_refs_with(path, refs, options, |_| {})
}

/// [`rewrite_refs`], calling `on_update` for each update as the walk makes
/// it, before anything is written.
pub fn rewrite_refs_with<F>(
    path: impl AsRef<Path>,
    refs: &RefMap,
    options: &SyncOptions,
    on_update: F,
) -> Result<Vec<RefUpdate>, SyncError>
where
    F: FnMut(&RefUpdate),
{
    let mut doc = SchemaDocument::load(path)?;
    let updates = apply_refs_with(&mut doc, refs, on_update)?;

    if options.dry_run {
        tracing::info!(
            path = %doc.path().display(),
            updates = updates.len(),
            "dry run, derived schema not written"
        );
    } else {
        doc.save(options.indent)?;
    }

    Ok(updates)
}

/// Apply `refs` to the `$defs` section of an in-memory document.
pub fn apply_refs(doc: &mut SchemaDocument, refs: &RefMap) -> Result<Vec<RefUpdate>, SyncError> {
    apply_refs_with(doc, refs, |_| {})
}

/// [`apply_refs`], calling `on_update` for each update as it is made.
pub fn apply_refs_with<F>(
    doc: &mut SchemaDocument,
    refs: &RefMap,
    on_update: F,
) -> Result<Vec<RefUpdate>, SyncError>
where
    F: FnMut(&RefUpdate),
{
    let root = defs_pointer();
    let defs = doc.defs_mut()?;
    let mut walker = RefWalker::new(refs, on_update);
    for (key, value) in defs.iter_mut() {
        walker.visit_entry(key, value, &root);
    }
    Ok(walker.updates)
}

/// Recursively update `$ref` values under `node`, appending to `updates`.
///
/// `path` is the JSON Pointer of `node` and is used to label updates.
pub fn update_refs(node: &mut Value, refs: &RefMap, path: &str, updates: &mut Vec<RefUpdate>) {
    let mut walker = RefWalker::new(refs, |_: &RefUpdate| {});
    walker.walk(node, path);
    updates.append(&mut walker.updates);
}

struct RefWalker<'a, F> {
    refs: &'a RefMap,
    on_update: F,
    updates: Vec<RefUpdate>,
}

impl<'a, F> RefWalker<'a, F>
where
    F: FnMut(&RefUpdate),
{
    fn new(refs: &'a RefMap, on_update: F) -> Self {
        Self {
            refs,
            on_update,
            updates: Vec::new(),
        }
    }

    fn walk(&mut self, node: &mut Value, path: &str) {
        match node {
            Value::Object(obj) => {
                for (key, value) in obj.iter_mut() {
                    self.visit_entry(key, value, path);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let child_path = build_path(path, &[&index.to_string()]);
                    self.walk(item, &child_path);
                }
            }
            _ => {}
        }
    }

    fn visit_entry(&mut self, key: &str, value: &mut Value, parent_path: &str) {
        let child_path = build_path(parent_path, &[key]);
        let refs = self.refs;

        let Some(new_ref) = refs.get(key) else {
            self.walk(value, &child_path);
            return;
        };

        let Some(current) = value.as_object_mut().and_then(|obj| obj.get_mut(REF_KEY)) else {
            tracing::trace!(key, path = %child_path, "matched key has no $ref, leaving as-is");
            return;
        };

        let previous = std::mem::replace(current, Value::String(new_ref.clone()));
        tracing::info!(key, new_ref = %new_ref, "Updating $ref");
        let update = RefUpdate {
            key: key.to_string(),
            pointer: child_path,
            previous,
            new_ref: new_ref.clone(),
        };
        (self.on_update)(&update);
        self.updates.push(update);
    }
}

/// JSON Pointer of the `$defs` section.
pub fn defs_pointer() -> String {
    build_path("#", &[DEFS_KEY])
}
