//! Service configuration.
//!
//! All behaviour is controlled through [`ServiceConfig`], built via its
//! [`ServiceConfigBuilder`]. The storage bucket is deliberately a required
//! field with no default: the service must never silently upload into a
//! baked-in namespace.

use crate::error::Ply2GlbError;
use std::path::PathBuf;

/// Configuration for the conversion service.
///
/// Built via [`ServiceConfig::builder()`].
///
/// # Example
/// ```rust
/// use ply2glb::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .bucket("my-artifacts")
///     .pdal_bin("/usr/local/bin/pdal")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Destination GCS bucket for converted artifacts. Required.
    pub bucket: String,

    /// Object-key prefix inside the bucket. Default: `conversions`.
    pub key_prefix: String,

    /// Name or path of the PDAL binary. Default: `pdal`.
    ///
    /// Overridable so deployments can pin an absolute path and tests can
    /// substitute a stub tool.
    pub pdal_bin: String,

    /// Parent directory for request workspaces. Default: the system temp dir.
    ///
    /// Point this at a larger volume when converting big clouds; tests use it
    /// to observe that workspaces are gone after a request.
    pub workspace_root: Option<PathBuf>,

    /// Timeout for downloading the source point cloud, in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            key_prefix: "conversions".to_string(),
            pdal_bin: "pdal".to_string(),
            workspace_root: None,
            download_timeout_secs: 120,
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.bucket = bucket.into();
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.key_prefix = prefix.into();
        self
    }

    pub fn pdal_bin(mut self, bin: impl Into<String>) -> Self {
        self.config.pdal_bin = bin.into();
        self
    }

    pub fn workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.workspace_root = Some(root.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, Ply2GlbError> {
        let c = &self.config;
        if c.bucket.is_empty() {
            return Err(Ply2GlbError::InvalidConfig(
                "bucket must be set (there is no default bucket)".into(),
            ));
        }
        if c.key_prefix.is_empty() || c.key_prefix.starts_with('/') || c.key_prefix.ends_with('/') {
            return Err(Ply2GlbError::InvalidConfig(format!(
                "key_prefix must be non-empty without leading/trailing '/', got '{}'",
                c.key_prefix
            )));
        }
        if c.pdal_bin.is_empty() {
            return Err(Ply2GlbError::InvalidConfig("pdal_bin must be non-empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let c = ServiceConfig::builder().bucket("b").build().unwrap();
        assert_eq!(c.key_prefix, "conversions");
        assert_eq!(c.pdal_bin, "pdal");
        assert_eq!(c.download_timeout_secs, 120);
        assert!(c.workspace_root.is_none());
    }

    #[test]
    fn missing_bucket_is_rejected() {
        let err = ServiceConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains("bucket"));
    }

    #[test]
    fn slashed_key_prefix_is_rejected() {
        assert!(ServiceConfig::builder()
            .bucket("b")
            .key_prefix("/conversions")
            .build()
            .is_err());
        assert!(ServiceConfig::builder()
            .bucket("b")
            .key_prefix("conversions/")
            .build()
            .is_err());
        assert!(ServiceConfig::builder()
            .bucket("b")
            .key_prefix("nested/prefix")
            .build()
            .is_ok());
    }

    #[test]
    fn timeout_floor() {
        let c = ServiceConfig::builder()
            .bucket("b")
            .download_timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(c.download_timeout_secs, 1);
    }
}
