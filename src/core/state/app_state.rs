use std::path::{Path, PathBuf};

use crate::core::downloader::Downloader;
use crate::core::error::ManagerResult;
use crate::core::java::JavaRegistry;
use crate::core::layout::ServerLayout;
use crate::core::settings::{Settings, SETTINGS_FILE};
use crate::core::version::VersionCollection;

/// Everything a command needs about the server it operates on.
pub struct AppState {
    pub layout: ServerLayout,
    pub settings_path: PathBuf,
    pub settings: Settings,
    pub downloader: Downloader,
}

impl AppState {
    /// Load settings for the server rooted at `root`. The settings file
    /// defaults to `<root>/servermanager.json`.
    pub fn load(root: &Path, settings_path: Option<PathBuf>) -> ManagerResult<Self> {
        let layout = ServerLayout::new(root);
        let settings_path = settings_path.unwrap_or_else(|| root.join(SETTINGS_FILE));
        let settings = Settings::load_or_create(&settings_path)?;
        let downloader = Downloader::new()?;

        Ok(Self {
            layout,
            settings_path,
            settings,
            downloader,
        })
    }

    pub fn registry(&self) -> JavaRegistry {
        self.settings.java.registry()
    }

    /// An empty collection bound to this server and its Java registry.
    pub fn collection(&self) -> VersionCollection {
        VersionCollection::new(self.layout.clone(), self.registry())
    }
}
