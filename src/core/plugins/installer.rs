use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;
use tracing::info;

use crate::core::downloader::Downloader;
use crate::core::error::{ManagerError, ManagerResult};
use crate::core::settings::{GitPluginSettings, PluginSettings};

use super::{git::GitPluginInstaller, url::UrlPluginInstaller};

/// Everything an installer needs from the surrounding server.
pub struct PluginContext<'a> {
    pub server_root: &'a Path,
    pub plugins_dir: &'a Path,
    pub downloader: &'a Downloader,
    /// Replace jars that are already installed.
    pub update: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOutcome {
    AlreadyInstalled(Vec<String>),
    Installed(PathBuf),
}

#[async_trait]
pub trait PluginInstaller: Send + Sync {
    fn name(&self) -> &str;

    async fn install(&self, ctx: &PluginContext<'_>) -> ManagerResult<PluginOutcome>;
}

/// Dispatcher over the supported plugin sources.
pub enum Installer {
    Url(UrlPluginInstaller),
    Git(GitPluginInstaller),
}

impl Installer {
    pub fn from_url(settings: PluginSettings) -> Self {
        Self::Url(UrlPluginInstaller::new(settings))
    }

    pub fn from_git(settings: GitPluginSettings) -> Self {
        Self::Git(GitPluginInstaller::new(settings))
    }

    pub fn name(&self) -> &str {
        match self {
            Installer::Url(i) => i.name(),
            Installer::Git(i) => i.name(),
        }
    }

    pub async fn install(&self, ctx: &PluginContext<'_>) -> ManagerResult<PluginOutcome> {
        match self {
            Installer::Url(i) => i.install(ctx).await,
            Installer::Git(i) => i.install(ctx).await,
        }
    }
}

/// Jar names in `plugins_dir` that belong to plugin `name`
/// (`<name>.jar`, `<name>-<anything>.jar`, `<name><anything>.jar`).
pub fn find_installed(plugins_dir: &Path, name: &str) -> ManagerResult<Vec<String>> {
    let pattern = Regex::new(&format!(r"^{}-?.*\.jar$", regex::escape(name)))?;
    let entries = match std::fs::read_dir(plugins_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ManagerError::io(plugins_dir, e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ManagerError::io(plugins_dir, e))?;
        if let Ok(file_name) = entry.file_name().into_string() {
            if pattern.is_match(&file_name) && entry.path().is_file() {
                found.push(file_name);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Check for an existing install. With `update`, existing jars are removed
/// and `None` is returned so the caller installs afresh.
pub(crate) fn existing_install(
    ctx: &PluginContext<'_>,
    name: &str,
) -> ManagerResult<Option<PluginOutcome>> {
    let found = find_installed(ctx.plugins_dir, name)?;
    if found.is_empty() {
        return Ok(None);
    }
    if !ctx.update {
        info!("Found {} in plugins folder", found.join(", "));
        return Ok(Some(PluginOutcome::AlreadyInstalled(found)));
    }
    for file_name in &found {
        let path = ctx.plugins_dir.join(file_name);
        std::fs::remove_file(&path).map_err(|e| ManagerError::io(&path, e))?;
        info!("Removed {} from plugins folder to update", file_name);
    }
    Ok(None)
}
