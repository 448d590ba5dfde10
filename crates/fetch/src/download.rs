//! Streaming downloads.
//!
//! Archives here can run into the hundreds of megabytes (ffmpeg static
//! builds, font families), so responses are streamed to disk rather than
//! buffered. The SHA-256 of the payload is computed on the way through and
//! logged for traceability; it is not compared against anything.

use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use vhs_action_core::{Error, Result};

/// Authentication to attach to a download request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadAuth<'a> {
    /// Bearer token, when the source needs one.
    pub token: Option<&'a str>,
    /// Request the raw binary from an API asset endpoint.
    pub octet_stream: bool,
}

/// Download `url` to `dest`, streaming.
///
/// # Errors
///
/// Returns an error on transport failure, a non-success status, or a write
/// failure. `dest` may be left partially written on failure; callers stage
/// downloads in temporary locations.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    auth: DownloadAuth<'_>,
    dest: &Path,
) -> Result<()> {
    debug!(%url, "Downloading");

    let mut request = client.get(url);
    if let Some(token) = auth.token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }
    if auth.octet_stream {
        request = request.header("Accept", "application/octet-stream");
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut hasher = Sha256::new();
    let mut total: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        hasher.update(&chunk);
        total += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    let sha256 = hex::encode(hasher.finalize());
    debug!(%url, bytes = total, %sha256, ?dest, "Downloaded");
    Ok(())
}
