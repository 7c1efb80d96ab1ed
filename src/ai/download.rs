//! Model download from the public GGUF catalog.
//!
//! Bytes are streamed into `<file>.part` next to the destination and the
//! file is renamed into place only after the body completed, so an
//! interrupted download never looks like a usable model. A failed transfer
//! removes the partial file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Where the catalog models are published.
pub const DEFAULT_CATALOG_URL: &str = "https://gpt4all.io/models/gguf/";

/// Download URL for a catalog file name.
pub fn model_url(catalog_url: &str, file_name: &str) -> String {
    format!("{}/{}", catalog_url.trim_end_matches('/'), file_name)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Stream the response body into `tmp`. Returns bytes written.
async fn write_body(resp: &mut reqwest::Response, url: &str, tmp: &Path) -> Result<u64> {
    let mut file = fs::File::create(tmp)
        .await
        .with_context(|| format!("Failed to create {}", tmp.display()))?;

    let mut written = 0u64;
    while let Some(chunk) = resp
        .chunk()
        .await
        .with_context(|| format!("Download of {} was interrupted", url))?
    {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Fetch `url` into `dest`, creating parent directories. Returns bytes written.
pub async fn download_model(http: &reqwest::Client, url: &str, dest: &Path) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create models directory: {}", parent.display()))?;
    }

    info!(url, dest = %dest.display(), "downloading model");
    let mut resp = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to request {}", url))?;
    if !resp.status().is_success() {
        bail!("Download of {} failed with HTTP {}", url, resp.status());
    }

    let tmp = partial_path(dest);
    let written = match write_body(&mut resp, url, &tmp).await {
        Ok(n) => n,
        Err(e) => {
            if let Err(rm) = fs::remove_file(&tmp).await {
                warn!(error = %rm, path = %tmp.display(), "failed to remove partial download");
            }
            return Err(e);
        }
    };

    fs::rename(&tmp, dest).await.with_context(|| {
        format!("Failed to replace {} with {}", dest.display(), tmp.display())
    })?;

    info!(bytes = written, "model download complete");
    Ok(written)
}
