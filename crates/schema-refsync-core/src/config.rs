//! Configuration for reference synchronization.

use serde::{Deserialize, Serialize};

/// Indentation used when rewriting the derived schema.
pub const DEFAULT_INDENT: usize = 2;

/// Options for a synchronization run.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `dry-run`). Missing fields
/// fall back to their defaults, so a config file may set only what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SyncOptions {
    /// Spaces per indentation level in the rewritten file. Default: 2.
    pub indent: usize,
    /// Compute and report updates without writing the derived file.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            dry_run: false,
        }
    }
}
