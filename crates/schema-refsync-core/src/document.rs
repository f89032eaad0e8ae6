//! Schema document I/O and JSON Pointer helpers.
//!
//! Every stage loads its own [`SchemaDocument`] from disk; no decoded tree is
//! shared between stages.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::SyncError;

/// Key of the definitions section.
pub const DEFS_KEY: &str = "$defs";
/// Key of a reference field.
pub const REF_KEY: &str = "$ref";

/// A decoded JSON Schema document and the file it came from.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    path: PathBuf,
    value: Value,
}

impl SchemaDocument {
    /// Wrap an already-decoded value. `path` labels errors and writes.
    pub fn from_value(path: impl Into<PathBuf>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    /// Read and decode a schema file.
    ///
    /// The top level must be a JSON object; anything else is a decode error.
    /// The file handle is closed before this returns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SyncError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let root: Map<String, Value> =
            serde_json::from_reader(reader).map_err(|source| SyncError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::trace!(path = %path.display(), "loaded schema document");
        Ok(Self::from_value(path, Value::Object(root)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The top-level `$defs` object.
    pub fn defs(&self) -> Result<&Map<String, Value>, SyncError> {
        self.value
            .get(DEFS_KEY)
            .and_then(Value::as_object)
            .ok_or_else(|| SyncError::MissingDefs {
                path: self.path.clone(),
            })
    }

    /// Mutable access to the top-level `$defs` object.
    pub fn defs_mut(&mut self) -> Result<&mut Map<String, Value>, SyncError> {
        let path = &self.path;
        self.value
            .get_mut(DEFS_KEY)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| SyncError::MissingDefs { path: path.clone() })
    }

    /// Encode the whole document with `indent` spaces per level and a
    /// trailing newline.
    pub fn encode(&self, indent: usize) -> Result<Vec<u8>, SyncError> {
        let indent_str = " ".repeat(indent);
        let formatter = PrettyFormatter::with_indent(indent_str.as_bytes());
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.value
            .serialize(&mut serializer)
            .map_err(|source| SyncError::Encode {
                path: self.path.clone(),
                source,
            })?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Encode and overwrite the backing file.
    ///
    /// Encoding completes before the file is opened, so an encode failure
    /// leaves the file as it was. The replace is not atomic.
    pub fn save(&self, indent: usize) -> Result<(), SyncError> {
        let bytes = self.encode(indent)?;
        let io_err = |source: std::io::Error| SyncError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = File::create(&self.path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "wrote schema document");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON Pointer escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use schema_refsync_core::build_path;
/// assert_eq!(build_path("#", &["$defs", "a/b"]), "#/$defs/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

// ===========================================================================
// Tests
// ===========================================================================
