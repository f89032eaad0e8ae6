//! Extract → collect → rewrite, as one run.

use std::path::Path;

use serde::Serialize;

use crate::collect::{collect_refs, RefMap};
use crate::config::SyncOptions;
use crate::error::{RunError, Stage};
use crate::extract::extract_keys;
use crate::rewrite::{rewrite_refs_with, RefUpdate};

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Number of definition names found in the derived schema.
    pub keys_extracted: usize,
    /// References collected from the base schema.
    pub refs: RefMap,
    /// Every `$ref` that was overwritten, in traversal order.
    pub updates: Vec<RefUpdate>,
    /// Whether the derived file was rewritten (false on dry runs).
    pub written: bool,
}

impl SyncReport {
    /// Process exit status for a completed run.
    pub fn exit_code(&self) -> u8 {
        0
    }
}

/// Copy `$ref` values from `base_path` into `derived_path` for every
/// definition name the two schemas share.
///
/// Each stage reads its input from disk independently. The first failing
/// stage aborts the run and is named in the returned [`RunError`].
///
/// # Example
///
/// ```rust,no_run
/// use schema_refsync_core::{change_references, SyncOptions};
///
/// let report = change_references("v2.dataType.schema.json", "base.schema.json", &SyncOptions::default())?;
/// for update in &report.updates {
///     println!("{update}");
/// }
/// # Ok::<(), schema_refsync_core::RunError>(())
/// ```
pub fn change_references(
    derived_path: impl AsRef<Path>,
    base_path: impl AsRef<Path>,
    options: &SyncOptions,
) -> Result<SyncReport, RunError> {
    change_references_with(derived_path, base_path, options, |_| {})
}

/// [`change_references`], calling `on_update` as each `$ref` is overwritten.
///
/// Notices arrive during the rewrite walk, so they are delivered even if the
/// final write then fails.
pub fn change_references_with<F>(
    derived_path: impl AsRef<Path>,
    base_path: impl AsRef<Path>,
    options: &SyncOptions,
    on_update: F,
) -> Result<SyncReport, RunError>
where
    F: FnMut(&RefUpdate),
{
    let derived_path = derived_path.as_ref();
    let base_path = base_path.as_ref();

    let keys = extract_stage(derived_path)?;
    let refs = collect_stage(&keys, base_path)?;
    let updates = replace_stage(derived_path, &refs, options, on_update)?;

    tracing::info!(
        derived = %derived_path.display(),
        base = %base_path.display(),
        keys = keys.len(),
        refs = refs.len(),
        updates = updates.len(),
        dry_run = options.dry_run,
        "reference sync complete"
    );

    Ok(SyncReport {
        keys_extracted: keys.len(),
        refs,
        updates,
        written: !options.dry_run,
    })
}

fn extract_stage(derived_path: &Path) -> Result<Vec<String>, RunError> {
    extract_keys(derived_path).map_err(|e| RunError::new(Stage::ExtractKeys, e))
}

fn collect_stage(keys: &[String], base_path: &Path) -> Result<RefMap, RunError> {
    collect_refs(keys, base_path).map_err(|e| RunError::new(Stage::CollectRefs, e))
}

fn replace_stage<F>(
    derived_path: &Path,
    refs: &RefMap,
    options: &SyncOptions,
    on_update: F,
) -> Result<Vec<RefUpdate>, RunError>
where
    F: FnMut(&RefUpdate),
{
    rewrite_refs_with(derived_path, refs, options, on_update)
        .map_err(|e| RunError::new(Stage::ReplaceRefs, e))
}
