//! Declarative PDAL pipeline description.
//!
//! ## Why pipeline-as-data?
//!
//! PDAL executes a JSON document listing named stages rather than taking
//! format flags on the command line. Modelling that document as
//! [`PipelineSpec`] keeps the stage sequence independent of the invocation
//! code in [`crate::convert`]: stages can be added or reordered here without
//! touching how the subprocess is launched.

use crate::error::Ply2GlbError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// One named PDAL stage with its parameters.
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    /// PDAL stage identifier, e.g. `readers.ply` or `filters.delaunay`.
    #[serde(rename = "type")]
    pub kind: String,

    /// File path for reader/writer stages; filters carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Stage {
    fn reader(kind: &str, path: &Path) -> Self {
        Self {
            kind: kind.to_string(),
            filename: Some(path.to_string_lossy().into_owned()),
        }
    }

    fn filter(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            filename: None,
        }
    }

    fn writer(kind: &str, path: &Path) -> Self {
        Self {
            kind: kind.to_string(),
            filename: Some(path.to_string_lossy().into_owned()),
        }
    }
}

/// An ordered sequence of PDAL stages, serialised as `{"pipeline": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSpec {
    pipeline: Vec<Stage>,
}

impl PipelineSpec {
    /// The three-stage point-cloud-to-mesh pipeline used by this service:
    /// read PLY (fixed input format, never sniffed), Delaunay surface
    /// reconstruction, write a GLB container.
    pub fn point_cloud_to_mesh(input: &Path, output: &Path) -> Self {
        Self {
            pipeline: vec![
                Stage::reader("readers.ply", input),
                Stage::filter("filters.delaunay"),
                Stage::writer("writers.gltf", output),
            ],
        }
    }

    /// The stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.pipeline
    }

    /// Serialise the spec into a uniquely named `.json` descriptor file.
    ///
    /// The descriptor is deleted when the returned handle drops, so it never
    /// outlives the tool invocation regardless of how that invocation ends.
    pub fn write_descriptor(&self) -> Result<NamedTempFile, Ply2GlbError> {
        let mut descriptor = tempfile::Builder::new()
            .prefix("ply2glb-pipeline-")
            .suffix(".json")
            .tempfile()
            .map_err(|source| Ply2GlbError::Descriptor { source })?;

        let json = serde_json::to_vec(self)
            .map_err(|e| Ply2GlbError::Descriptor { source: e.into() })?;
        descriptor
            .write_all(&json)
            .and_then(|()| descriptor.flush())
            .map_err(|source| Ply2GlbError::Descriptor { source })?;

        Ok(descriptor)
    }
}
