//! Artifact publication to object storage.
//!
//! The handler talks to storage through the [`ArtifactStore`] trait so tests
//! can substitute an in-memory recorder; the real implementation is
//! [`GcsStore`], a thin wrapper over an explicitly constructed
//! `google-cloud-storage` client. The client is built once at process startup
//! by the composition root and shared; nothing here reaches for ambient
//! credentials per request.

use crate::error::Ply2GlbError;
use async_trait::async_trait;
use chrono::Utc;
use google_cloud_storage::client::Client;
use google_cloud_storage::http::object_access_controls::PredefinedObjectAcl;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// File extension of the published artifact.
pub const OUTPUT_EXT: &str = "glb";

/// A destination for converted artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload the file at `path` under `key` and mark it publicly readable.
    /// Whole-file transfer, no retry.
    async fn put_public(&self, key: &str, path: &Path) -> Result<(), Ply2GlbError>;

    /// The stable retrieval URL for `key`. Derived from a fixed template,
    /// never queried from the store, so it cannot fail independently of the
    /// upload.
    fn public_url(&self, key: &str) -> String;
}

/// Compute the `storage.googleapis.com` URL for an object.
pub fn gcs_public_url(bucket: &str, key: &str) -> String {
    format!("https://storage.googleapis.com/{bucket}/{key}")
}

/// Generate a collision-free object key under `prefix`.
///
/// The timestamp keeps keys human-sortable; the random suffix closes the
/// same-second collision window that a timestamp alone would leave open
/// under concurrent requests.
pub fn object_key(prefix: &str) -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let token = Uuid::new_v4().simple().to_string();
    format!("{prefix}/converted_{stamp}_{}.{OUTPUT_EXT}", &token[..8])
}

/// Google Cloud Storage implementation of [`ArtifactStore`].
pub struct GcsStore {
    client: Client,
    bucket: String,
}

impl GcsStore {
    /// Wrap an already-authenticated client, scoped to `bucket`.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for GcsStore {
    async fn put_public(&self, key: &str, path: &Path) -> Result<(), Ply2GlbError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Ply2GlbError::Upload {
                key: key.to_string(),
                reason: format!("cannot read '{}': {e}", path.display()),
            })?;
        let size = data.len();

        let mut media = Media::new(key.to_string());
        media.content_type = "model/gltf-binary".into();

        self.client
            .upload_object(
                &UploadObjectRequest {
                    bucket: self.bucket.clone(),
                    predefined_acl: Some(PredefinedObjectAcl::PublicRead),
                    ..Default::default()
                },
                data,
                &UploadType::Simple(media),
            )
            .await
            .map_err(|e| Ply2GlbError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        info!("uploaded {size} bytes to gs://{}/{key}", self.bucket);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        gcs_public_url(&self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_follows_the_fixed_template() {
        assert_eq!(
            gcs_public_url("my-bucket", "conversions/converted_x.glb"),
            "https://storage.googleapis.com/my-bucket/conversions/converted_x.glb"
        );
    }

    #[test]
    fn object_key_shape() {
        let key = object_key("conversions");
        assert!(key.starts_with("conversions/converted_"), "got: {key}");
        assert!(key.ends_with(".glb"), "got: {key}");
        // prefix + "/converted_" + 15-char stamp + "_" + 8 hex + ".glb"
        let name = key.rsplit('/').next().unwrap();
        assert_eq!(name.len(), "converted_".len() + 15 + 1 + 8 + 4);
    }

    #[test]
    fn object_keys_never_repeat() {
        // Same second on purpose: the random suffix must disambiguate.
        let a = object_key("conversions");
        let b = object_key("conversions");
        assert_ne!(a, b);
    }
}
