//! Error types for reference synchronization.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Variant names and their serialized `snake_case` strings are part of the
/// public contract and must not change across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// A schema file could not be opened, read, or written.
    IoError,
    /// A schema file is not valid JSON.
    JsonParseError,
    /// The document has no top-level `$defs` object.
    SchemaError,
    /// The updated document could not be encoded.
    JsonEncodeError,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("$defs section not found or is not an object in {}", .path.display())]
    MissingDefs { path: PathBuf },

    #[error("JSON encoding error for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SyncError::Io { .. } => ErrorCode::IoError,
            SyncError::Parse { .. } => ErrorCode::JsonParseError,
            SyncError::MissingDefs { .. } => ErrorCode::SchemaError,
            SyncError::Encode { .. } => ErrorCode::JsonEncodeError,
        }
    }

    /// The file the error relates to.
    pub fn path(&self) -> &Path {
        match self {
            SyncError::Io { path, .. }
            | SyncError::Parse { path, .. }
            | SyncError::MissingDefs { path }
            | SyncError::Encode { path, .. } => path,
        }
    }

    /// Produces a structured JSON error.
    ///
    /// Format: `{"code": "...", "message": "...", "path": "..."}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "path": self.path().display().to_string(),
        })
    }
}

/// The pipeline stage that detected a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ExtractKeys,
    CollectRefs,
    ReplaceRefs,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::ExtractKeys => "extracting keys",
            Stage::CollectRefs => "getting references",
            Stage::ReplaceRefs => "replacing references",
        };
        f.write_str(label)
    }
}

/// A [`SyncError`] tagged with the stage that aborted the run.
#[derive(Debug, Error)]
#[error("Error {stage}: {source}")]
pub struct RunError {
    pub stage: Stage,
    #[source]
    pub source: SyncError,
}

impl RunError {
    pub fn new(stage: Stage, source: SyncError) -> Self {
        Self { stage, source }
    }

    /// Process exit status for this failure. Always nonzero.
    pub fn exit_code(&self) -> u8 {
        match self.source.error_code() {
            ErrorCode::IoError => 2,
            ErrorCode::JsonParseError => 3,
            ErrorCode::SchemaError => 4,
            ErrorCode::JsonEncodeError => 5,
        }
    }

    /// [`SyncError::to_json`] plus the failing stage.
    ///
    /// Format: `{"stage": "...", "code": "...", "message": "...", "path": "..."}`
    pub fn to_json(&self) -> serde_json::Value {
        let mut json = self.source.to_json();
        json["stage"] = serde_json::json!(self.stage);
        json["message"] = serde_json::json!(self.to_string());
        json
    }
}

// ===========================================================================
// Tests
// ===========================================================================
