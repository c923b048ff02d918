//! # ply2glb
//!
//! Convert PLY point clouds to GLB meshes over HTTP.
//!
//! ## Why this crate?
//!
//! Point clouds render poorly in stock 3D viewers: most want a triangulated
//! mesh in a container format like GLB. The mathematics of triangulation is a
//! solved problem that PDAL already implements, so this service stays out of
//! the geometry business entirely. It sequences the steps — download the
//! cloud, hand it to PDAL, publish the result — and owns the one piece of
//! design worth owning: a request-scoped workspace whose temporary files can
//! never outlive their request.
//!
//! ## Pipeline Overview
//!
//! ```text
//! GET /convert?url=…
//!  │
//!  ├─ 1. Workspace  allocate a private temp dir (deleted on every exit path)
//!  ├─ 2. Fetch      stream the PLY from the URL to disk, bounded memory
//!  ├─ 3. Convert    pdal pipeline <descriptor>   (readers.ply →
//!  │                filters.delaunay → writers.gltf, descriptor deleted)
//!  ├─ 4. Publish    upload to GCS under conversions/…, mark public
//!  └─ 5. Respond    {"glb_url": …, "message": "Conversion successful"}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ply2glb::{AppContext, GcsStore, ServiceConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::builder().bucket("my-artifacts").build()?;
//!     let gcs = google_cloud_storage::client::ClientConfig::default()
//!         .with_auth()
//!         .await?;
//!     let store = GcsStore::new(google_cloud_storage::client::Client::new(gcs), "my-artifacts");
//!     let ctx = AppContext::new(config, Arc::new(store))?;
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     ply2glb::server::run(listener, ctx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ply2glb` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding only the library:
//! ```toml
//! ply2glb = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod publish;
pub mod server;
pub mod workspace;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use convert::convert_to_mesh;
pub use error::Ply2GlbError;
pub use fetch::download_file;
pub use pipeline::{PipelineSpec, Stage};
pub use publish::{gcs_public_url, object_key, ArtifactStore, GcsStore};
pub use server::{router, AppContext, ConversionResponse, ErrorResponse};
pub use workspace::Workspace;
