//! Request-scoped scratch workspace.
//!
//! ## Why a `TempDir` wrapper?
//!
//! PDAL works on file-system paths — it cannot read from a byte buffer. Each
//! request therefore needs a private directory holding exactly two files: the
//! downloaded input cloud and the converted output mesh. Owning a [`TempDir`]
//! makes cleanup automatic: the directory is recursively deleted when the
//! `Workspace` drops, on success, on error, and on panic alike. No temporary
//! file may outlive its request.

use crate::config::ServiceConfig;
use crate::error::Ply2GlbError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Fixed name of the downloaded input file inside a workspace.
pub const INPUT_FILE: &str = "input.ply";

/// Fixed name of the converted output file inside a workspace.
pub const OUTPUT_FILE: &str = "output.glb";

/// An exclusively-owned temporary directory for one conversion request.
///
/// Fixed file names are safe because the directory itself is unique per
/// request; nothing is ever shared between concurrent workspaces.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Workspace {
    /// Allocate a fresh workspace under `config.workspace_root` (or the
    /// system temp dir when unset).
    pub fn create(config: &ServiceConfig) -> Result<Self, Ply2GlbError> {
        let dir = match &config.workspace_root {
            Some(root) => TempDir::with_prefix_in("ply2glb-", root),
            None => TempDir::with_prefix("ply2glb-"),
        }
        .map_err(|source| Ply2GlbError::Workspace { source })?;

        let input = dir.path().join(INPUT_FILE);
        let output = dir.path().join(OUTPUT_FILE);
        debug!("allocated workspace: {}", dir.path().display());

        Ok(Self { dir, input, output })
    }

    /// Root of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the fetched point cloud is written.
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Where the converted mesh is expected.
    pub fn output_path(&self) -> &Path {
        &self.output
    }
}
