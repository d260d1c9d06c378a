use std::path::{Path, PathBuf};
use std::time::Instant;

use futures_util::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::error::{ManagerError, ManagerResult};

const USER_AGENT: &str = concat!("ServerManager/", env!("CARGO_PKG_VERSION"));

/// Streaming HTTP downloader with optional SHA-1 validation.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> ManagerResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Download `url` to `dest`, optionally validating SHA-1.
    ///
    /// The body is streamed into `<dest>.part` and only renamed onto `dest`
    /// once complete and validated. Returns the number of bytes written.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> ManagerResult<u64> {
        let start = Instant::now();

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ManagerError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let partial = partial_path(dest);
        let mut hasher = Sha1::new();
        let mut downloaded: u64 = 0;

        {
            let mut file = tokio::fs::File::create(&partial)
                .await
                .map_err(|e| ManagerError::io(&partial, e))?;
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                hasher.update(&chunk);
                file.write_all(&chunk)
                    .await
                    .map_err(|e| ManagerError::io(&partial, e))?;
                downloaded += chunk.len() as u64;
                debug!("{}: {}/{:?} bytes", url, downloaded, total_bytes);
            }
            file.flush()
                .await
                .map_err(|e| ManagerError::io(&partial, e))?;
        }

        if let Some(expected) = sha1_expected {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(ManagerError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| ManagerError::io(&partial, e))?;

        info!(
            "Downloaded {} to {:?} ({} bytes) in {:.1} seconds",
            url,
            dest,
            downloaded,
            start.elapsed().as_secs_f64()
        );
        Ok(downloaded)
    }

    /// Validate an existing file's SHA-1.
    pub async fn validate_sha1(path: &Path, expected: &str) -> ManagerResult<bool> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ManagerError::io(path, e))?;
        let mut hasher = Sha1::new();
        hasher.update(&bytes);
        let actual = hex::encode(hasher.finalize());
        Ok(actual.eq_ignore_ascii_case(expected))
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
pub(crate) mod testing {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `body` with `status` to every connection on a local port.
    /// Returns the base URL.
    pub async fn serve(status: u16, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = [0u8; 2048];
                let _ = socket.read(&mut request).await;
                let head = format!(
                    "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }
}
