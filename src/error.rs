//! Error types for the ply2glb library.
//!
//! One enum, four failure groups, mirroring the stages of the conversion
//! pipeline: fetching the source point cloud, running the conversion tool,
//! uploading the artifact, and allocating the scratch workspace. The request
//! handler treats every group the same way (log, respond with the stringified
//! cause) except for the HTTP status: fetch failures are the upstream's (or
//! the caller-supplied URL's) fault and map to `502`, everything else is ours
//! and maps to `500`. See [`Ply2GlbError::is_upstream_fault`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ply2glb library.
#[derive(Debug, Error)]
pub enum Ply2GlbError {
    // ── Fetch errors ──────────────────────────────────────────────────────
    /// Network failure, or failure writing the downloaded bytes to disk.
    #[error("failed to download '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// The source URL answered with a non-success HTTP status.
    #[error("download of '{url}' failed: upstream returned HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The conversion tool exited non-zero. `stderr` is carried verbatim:
    /// it is the only diagnostic the tool produces.
    #[error("conversion failed (exit status {status}): {stderr}")]
    ToolFailed { status: i32, stderr: String },

    /// The conversion tool could not be started at all.
    #[error("failed to run conversion tool '{tool}': {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline descriptor file could not be written.
    #[error("failed to write pipeline descriptor: {source}")]
    Descriptor {
        #[source]
        source: std::io::Error,
    },

    /// The tool exited zero but left no output file behind.
    #[error("conversion tool exited cleanly but produced no output at '{path}'")]
    OutputMissing { path: PathBuf },

    // ── Upload errors ─────────────────────────────────────────────────────
    /// Storage authentication or transfer failure.
    #[error("failed to upload '{key}': {reason}")]
    Upload { key: String, reason: String },

    // ── Workspace errors ──────────────────────────────────────────────────
    /// The request-scoped temporary directory could not be allocated.
    #[error("failed to allocate scratch workspace: {source}")]
    Workspace {
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Ply2GlbError {
    /// The pipeline stage this error belongs to, for log context.
    pub fn stage(&self) -> &'static str {
        match self {
            Ply2GlbError::Fetch { .. } | Ply2GlbError::UpstreamStatus { .. } => "fetch",
            Ply2GlbError::ToolFailed { .. }
            | Ply2GlbError::ToolSpawn { .. }
            | Ply2GlbError::Descriptor { .. }
            | Ply2GlbError::OutputMissing { .. } => "convert",
            Ply2GlbError::Upload { .. } => "upload",
            Ply2GlbError::Workspace { .. } => "workspace",
            Ply2GlbError::InvalidConfig(_) => "config",
        }
    }

    /// True when the failure originates at the source URL rather than in this
    /// service. The handler maps these to `502 Bad Gateway`.
    pub fn is_upstream_fault(&self) -> bool {
        matches!(
            self,
            Ply2GlbError::Fetch { .. } | Ply2GlbError::UpstreamStatus { .. }
        )
    }
}
