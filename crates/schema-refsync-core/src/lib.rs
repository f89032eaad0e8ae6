//! # schema-refsync-core
//!
//! Copies `$ref` pointers from a base JSON Schema into a derived schema,
//! matched by shared `$defs` names.
//!
//! A run has three stages, each reading its input fresh from disk:
//!
//! 1. [`extract_keys`]: definition names under the derived schema's `$defs`.
//! 2. [`collect_refs`]: `name → $ref` for names the base schema defines with a
//!    string `$ref`.
//! 3. [`rewrite_refs`]: overwrite matching `$ref` fields in the derived
//!    schema and save it.
//!
//! [`change_references`] runs all three.

pub mod collect;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod rewrite;

pub use collect::{collect_refs, refs_for_keys, RefMap};
pub use config::SyncOptions;
pub use document::{build_path, escape_pointer_segment, SchemaDocument};
pub use error::{ErrorCode, RunError, Stage, SyncError};
pub use extract::{definition_keys, extract_keys};
pub use pipeline::{change_references, change_references_with, SyncReport};
pub use rewrite::{
    apply_refs, apply_refs_with, rewrite_refs, rewrite_refs_with, update_refs, RefUpdate,
};
