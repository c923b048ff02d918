//! Subprocess invocation of the PDAL conversion tool.
//!
//! ## Why a subprocess?
//!
//! PDAL ships native bindings, but linking them couples this service to the
//! geometry library's runtime and its compilation quirks. Running
//! `pdal pipeline <descriptor>` keeps the boundary at a process: the only
//! contract is the descriptor JSON in and an exit status plus stderr out.

use crate::error::Ply2GlbError;
use crate::pipeline::PipelineSpec;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Convert the point cloud at `input` into a GLB mesh at `output` by running
/// the external tool to completion.
///
/// The pipeline descriptor is written to a temp file that is removed when
/// this function returns, on every path. A non-zero exit surfaces the tool's
/// captured stderr — its only diagnostic — in the returned error.
pub async fn convert_to_mesh(
    pdal_bin: &str,
    input: &Path,
    output: &Path,
) -> Result<(), Ply2GlbError> {
    info!(
        "converting {} -> {}",
        input.display(),
        output.display()
    );

    let spec = PipelineSpec::point_cloud_to_mesh(input, output);
    let descriptor = spec.write_descriptor()?;
    debug!("pipeline descriptor: {}", descriptor.path().display());

    // `descriptor` drops at every return below, deleting the file.
    let result = Command::new(pdal_bin)
        .arg("pipeline")
        .arg(descriptor.path())
        .output()
        .await
        .map_err(|source| Ply2GlbError::ToolSpawn {
            tool: pdal_bin.to_string(),
            source,
        })?;

    if !result.status.success() {
        return Err(Ply2GlbError::ToolFailed {
            status: result.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        });
    }

    if !output.exists() {
        return Err(Ply2GlbError::OutputMissing {
            path: output.to_path_buf(),
        });
    }

    let stdout = String::from_utf8_lossy(&result.stdout);
    if !stdout.trim().is_empty() {
        debug!("tool stdout: {}", stdout.trim());
    }
    info!("conversion tool finished: {}", output.display());
    Ok(())
}
