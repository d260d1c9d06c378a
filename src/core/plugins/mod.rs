// ─── Plugins ───
// Third-party plugin jars: direct downloads and git-built plugins.

pub mod git;
pub mod installer;
pub mod url;

pub use git::GitPluginInstaller;
pub use installer::{find_installed, Installer, PluginContext, PluginInstaller, PluginOutcome};
pub use url::UrlPluginInstaller;
