use async_trait::async_trait;
use tracing::{info, warn};

use crate::core::downloader::Downloader;
use crate::core::error::{ManagerError, ManagerResult};
use crate::core::settings::PluginSettings;

use super::installer::{existing_install, PluginContext, PluginInstaller, PluginOutcome};

/// A plugin downloaded from a fixed URL to `plugins/<name>.jar`.
///
/// With a `sha1` configured, a `<name>.jar` that no longer matches it is
/// deleted and downloaded again.
pub struct UrlPluginInstaller {
    settings: PluginSettings,
}

impl UrlPluginInstaller {
    pub fn new(settings: PluginSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PluginInstaller for UrlPluginInstaller {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn install(&self, ctx: &PluginContext<'_>) -> ManagerResult<PluginOutcome> {
        let dest = ctx.plugins_dir.join(format!("{}.jar", self.settings.name));
        if let Some(expected) = self.settings.sha1.as_deref() {
            if dest.is_file() && !Downloader::validate_sha1(&dest, expected).await? {
                warn!("{:?} does not match its SHA-1, downloading it again", dest);
                tokio::fs::remove_file(&dest)
                    .await
                    .map_err(|e| ManagerError::io(&dest, e))?;
            }
        }

        if let Some(outcome) = existing_install(ctx, &self.settings.name)? {
            return Ok(outcome);
        }

        info!("Downloading {} from {}", self.settings.name, self.settings.download_url);
        ctx.downloader
            .download_file(
                &self.settings.download_url,
                &dest,
                self.settings.sha1.as_deref(),
            )
            .await?;
        Ok(PluginOutcome::Installed(dest))
    }
}
