use std::path::PathBuf;

use tracing::info;

use crate::core::error::ManagerResult;
use crate::core::layout::ServerLayout;
use crate::core::settings::ServerSoftwareSettings;

use super::Downloader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    AlreadyPresent(PathBuf),
    Downloaded(PathBuf),
}

/// Download the configured server software into the versions folder as
/// `<Title>-<version>.jar`, unless it is already there (or `force`).
///
/// A copy currently sitting in the active slot counts as present.
pub async fn fetch_server_jar(
    downloader: &Downloader,
    server: &ServerSoftwareSettings,
    layout: &ServerLayout,
    force: bool,
) -> ManagerResult<FetchOutcome> {
    let file_name = server.file_name();
    let dest = layout.stored_path(&file_name);

    if !force {
        for existing in [dest.clone(), layout.active_path(&file_name)] {
            if existing.is_file() {
                info!("Found {:?}", existing);
                return Ok(FetchOutcome::AlreadyPresent(existing));
            }
        }
    }

    info!("Downloading {} from {}", file_name, server.download_url);
    downloader
        .download_file(&server.download_url, &dest, None)
        .await?;
    Ok(FetchOutcome::Downloaded(dest))
}
