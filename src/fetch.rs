//! Streamed download of the source point cloud.
//!
//! The response body is written to disk chunk by chunk rather than buffered
//! whole: point clouds can run to gigabytes, and the handler must keep memory
//! bounded regardless of input size. There is no retry — a failed fetch fails
//! the request.

use crate::error::Ply2GlbError;
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Download `url` to `dest`, streaming the body to disk.
///
/// Creates exactly one file at `dest`; parent directories are not created.
/// On a non-success upstream status nothing is written at all.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), Ply2GlbError> {
    info!("downloading point cloud from: {url}");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Ply2GlbError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Ply2GlbError::UpstreamStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| Ply2GlbError::Fetch {
            url: url.to_string(),
            reason: format!("cannot create '{}': {e}", dest.display()),
        })?;

    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Ply2GlbError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        file.write_all(&chunk)
            .await
            .map_err(|e| Ply2GlbError::Fetch {
                url: url.to_string(),
                reason: format!("write to '{}' failed: {e}", dest.display()),
            })?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| Ply2GlbError::Fetch {
        url: url.to_string(),
        reason: format!("flush of '{}' failed: {e}", dest.display()),
    })?;

    debug!("downloaded {written} bytes to {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;

    /// Serve `body` with `status` on an ephemeral local port.
    async fn stub_upstream(status: StatusCode, body: &'static [u8]) -> SocketAddr {
        let app = Router::new().route("/cloud.ply", get(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    const PLY: &[u8] = b"ply\nformat ascii 1.0\nelement vertex 0\nend_header\n";

    #[tokio::test]
    async fn downloads_body_to_dest() {
        let addr = stub_upstream(StatusCode::OK, PLY).await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("input.ply");

        download_file(
            &reqwest::Client::new(),
            &format!("http://{addr}/cloud.ply"),
            &dest,
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), PLY);
    }

    #[tokio::test]
    async fn non_success_status_writes_nothing() {
        let addr = stub_upstream(StatusCode::NOT_FOUND, b"gone").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("input.ply");

        let err = download_file(
            &reqwest::Client::new(),
            &format!("http://{addr}/cloud.ply"),
            &dest,
        )
        .await
        .unwrap_err();

        match err {
            Ply2GlbError::UpstreamStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("expected UpstreamStatus, got: {other}"),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn connection_failure_is_a_fetch_error() {
        // Bind then drop to find a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let err = download_file(
            &reqwest::Client::new(),
            &format!("http://{addr}/cloud.ply"),
            &dir.path().join("input.ply"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Ply2GlbError::Fetch { .. }));
    }

    #[tokio::test]
    async fn missing_parent_directory_is_not_created() {
        let addr = stub_upstream(StatusCode::OK, PLY).await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("no-such-dir").join("input.ply");

        let err = download_file(
            &reqwest::Client::new(),
            &format!("http://{addr}/cloud.ply"),
            &dest,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Ply2GlbError::Fetch { .. }));
        assert!(!dest.parent().unwrap().exists());
    }
}
