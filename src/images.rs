//! Best-effort download of article images.
//!
//! The local file name is the last segment of the image URL's path with
//! [`IMAGE_EXTENSION`] appended, placed in the output directory. Proxied
//! images (`...?url=<asset>`) are named after the proxied asset. Any
//! failure is logged and reported as an empty file name so that a missing
//! image never costs an article.

use crate::error::DownloadError;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{error, info, instrument};
use url::Url;

pub const IMAGE_EXTENSION: &str = ".jpg";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the bytes at a URL into a local file.
pub trait Downloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// [`Downloader`] over plain HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }
        let bytes = response.bytes().await?;
        fs::write(dest, &bytes).await?;
        Ok(())
    }
}

/// Derive the local file name for an image URL.
///
/// Uses the last non-empty path segment, or that of the `url` query
/// parameter when the image goes through a resizing proxy. Strings that do
/// not parse as absolute URLs are split on `/` as they are. Characters
/// outside `[A-Za-z0-9._-]` are replaced by `_`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(image_filename("https://img.example/a/photo?w=300").unwrap(), "photo.jpg");
/// let proxied = "https://dims.example/quality/90/?url=https%3A%2F%2Fcdn.example%2Fstory";
/// assert_eq!(image_filename(proxied).unwrap(), "story.jpg");
/// ```
pub fn image_filename(url: &str) -> Result<String, DownloadError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(DownloadError::EmptyUrl);
    }
    let segment = last_segment(url)
        .ok_or_else(|| DownloadError::NoFileName(url.to_string()))?;

    let stem: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.ends_with(IMAGE_EXTENSION) {
        Ok(stem)
    } else {
        Ok(format!("{stem}{IMAGE_EXTENSION}"))
    }
}

fn last_segment(url: &str) -> Option<String> {
    let Ok(parsed) = Url::parse(url) else {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        return path
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string);
    };

    let proxied = parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .and_then(|(_, target)| last_segment(&target));
    if proxied.is_some() {
        return proxied;
    }
    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
}

/// Download `url` into `output_dir` and return the local path.
///
/// Returns an empty string, after logging, if anything goes wrong.
#[instrument(level = "info", skip(downloader, output_dir))]
pub async fn download_image<D: Downloader>(
    downloader: &D,
    url: &str,
    output_dir: &Path,
) -> String {
    let result = match image_filename(url) {
        Ok(name) => {
            let dest = output_dir.join(name);
            downloader.download(url, &dest).await.map(|()| dest)
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(dest) => {
            let filename = dest.display().to_string();
            info!(%url, %filename, "Downloaded image");
            filename
        }
        Err(e) => {
            error!(%url, error = %e, "Error downloading image");
            String::new()
        }
    }
}
