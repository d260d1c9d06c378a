// ─── Cleaner ───
// Removes server-generated folders and files between runs.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::settings::CleanSettings;

/// What a clean pass actually removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub folders_removed: usize,
    pub files_removed: usize,
    pub failures: usize,
}

/// Delete every configured folder and file under `root`.
///
/// Entries that do not exist are skipped; other failures are logged and the
/// pass continues.
pub async fn clean(settings: &CleanSettings, root: &Path) -> CleanReport {
    info!("Cleaning up directories");
    let mut report = CleanReport::default();

    for folder in &settings.folders {
        let path = root.join(folder);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                debug!("Removed folder {:?}", path);
                report.folders_removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Failed to delete folder {:?}: {}", path, e);
                report.failures += 1;
            }
        }
    }

    for file in &settings.files {
        let path = root.join(file);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed file {:?}", path);
                report.files_removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Failed to delete file {:?}: {}", path, e);
                report.failures += 1;
            }
        }
    }

    info!(
        "Cleaned {} folders and {} files",
        report.folders_removed, report.files_removed
    );
    report
}
