// ─── Settings ───
// `servermanager.json`: created with defaults on first run, backfilled when
// keys are missing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{ManagerError, ManagerResult};
use crate::core::java::compatibility::{default_overrides, DEFAULT_JAVA_MAJOR};
use crate::core::java::{CompatibilityTable, JavaRegistry};

pub const SETTINGS_FILE: &str = "servermanager.json";

const TOP_LEVEL_KEYS: [&str; 7] = [
    "flags",
    "reboot_delay_secs",
    "java",
    "clean",
    "server",
    "plugins",
    "git_plugins",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// JVM flags placed between the Java executable and `-jar`.
    pub flags: String,
    pub reboot_delay_secs: u64,
    pub java: JavaSettings,
    pub clean: CleanSettings,
    pub server: ServerSoftwareSettings,
    pub plugins: Vec<PluginSettings>,
    pub git_plugins: Vec<GitPluginSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JavaSettings {
    /// Java major version → executable.
    pub paths: BTreeMap<u32, PathBuf>,
    pub default_major: u32,
    /// Minecraft minor version → Java majors to offer it with.
    pub compatibility: BTreeMap<u32, Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CleanSettings {
    /// Clean before every start without asking.
    pub enabled: bool,
    /// Ask whether to clean on start when `enabled` is off.
    pub ask_on_start: bool,
    /// Clean between boot loop runs.
    pub also_on_reboot: bool,
    pub folders: Vec<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSoftwareSettings {
    pub title: String,
    pub minecraft_version: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginSettings {
    pub name: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
    pub download_url: String,
    #[serde(default)]
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallMode {
    /// Prompt before building.
    #[default]
    Ask,
    Build,
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitPluginSettings {
    pub name: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
    pub repo_url: String,
    pub repo_branch: String,
    /// Checkout location, relative to the server root.
    pub repo_path: String,
    #[serde(default)]
    pub install_mode: InstallMode,
}

fn enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flags: "-Xms4G -Xmx4G".into(),
            reboot_delay_secs: 5,
            java: JavaSettings::default(),
            clean: CleanSettings::default(),
            server: ServerSoftwareSettings::default(),
            plugins: default_plugins(),
            git_plugins: vec![GitPluginSettings {
                name: "Iris".into(),
                enabled: true,
                repo_url: "https://github.com/VolmitSoftware/Iris.git".into(),
                repo_branch: "master".into(),
                repo_path: "plugins/Iris/repo".into(),
                install_mode: InstallMode::Ask,
            }],
        }
    }
}

impl Default for JavaSettings {
    fn default() -> Self {
        Self {
            paths: BTreeMap::from([(11, PathBuf::from("java")), (16, PathBuf::from("java"))]),
            default_major: DEFAULT_JAVA_MAJOR,
            compatibility: default_overrides(),
        }
    }
}

impl Default for CleanSettings {
    fn default() -> Self {
        let folders = [
            "./crash-reports",
            "./logs",
            "./w",
            "./v",
            "./x",
            "./y",
            "./z",
            "./k",
            "./l",
            "./o",
            "./world/advancements",
            "./world/data",
            "./world/entities",
            "./world/playerdata",
            "./world/poi",
            "./world/region",
            "./world/stats",
            "./world_nether",
            "./world_the_end",
        ];
        let files = [
            "version_history.json",
            ".console_history",
            "banned-ips.json",
            "banned-players.json",
            "commands.yml",
            "help.yml",
            "permissions.yml",
            "wepif.yml",
            "whitelist.json",
            "usercache.json",
            "./world/level.dat",
            "./world/level.dat_old",
            "./world/session.lock",
            "./world/uid.dat",
        ];
        Self {
            enabled: false,
            ask_on_start: true,
            also_on_reboot: false,
            folders: folders.iter().map(|s| s.to_string()).collect(),
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ServerSoftwareSettings {
    fn default() -> Self {
        Self {
            title: "Purpur".into(),
            minecraft_version: "1.18.1".into(),
            download_url: "https://api.purpurmc.org/v2/purpur/1.18.1/latest/download".into(),
        }
    }
}

impl ServerSoftwareSettings {
    /// `<Title>-<minecraft version>.jar`, parseable as a version jar.
    pub fn file_name(&self) -> String {
        format!("{}-{}.jar", self.title, self.minecraft_version)
    }
}

fn default_plugins() -> Vec<PluginSettings> {
    let plugin = |name: &str, url: &str| PluginSettings {
        name: name.into(),
        enabled: true,
        download_url: url.into(),
        sha1: None,
    };
    vec![
        plugin(
            "Rift",
            "https://github.com/VolmitSoftware/Rift/releases/download/1.0.1/Rift-1.0.1.jar",
        ),
        plugin(
            "BileTools",
            "https://github.com/VolmitSoftware/BileTools/releases/download/2/BileTools-2.jar",
        ),
        plugin(
            "ViaVersion",
            "https://github.com/ViaVersion/ViaVersion/releases/download/4.5.1/ViaVersion-4.5.1.jar",
        ),
        plugin(
            "ViaBackwards",
            "https://github.com/ViaVersion/ViaBackwards/releases/download/4.5.1/ViaBackwards-4.5.1.jar",
        ),
    ]
}

impl JavaSettings {
    pub fn registry(&self) -> JavaRegistry {
        JavaRegistry::new(
            self.paths.clone(),
            CompatibilityTable::new(self.default_major, self.compatibility.clone()),
        )
    }
}

impl Settings {
    /// Load settings from `path`, writing defaults if the file is missing and
    /// rewriting it when top-level keys had to be filled in.
    pub fn load_or_create(path: &Path) -> ManagerResult<Self> {
        if !path.exists() {
            let settings = Settings::default();
            settings.save(path)?;
            info!("Created default settings at {:?}", path);
            return Ok(settings);
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ManagerError::io(path, e))?;
        let invalid = |source| ManagerError::InvalidSettings {
            path: path.to_path_buf(),
            source,
        };
        let value: serde_json::Value = serde_json::from_str(&raw).map_err(invalid)?;

        let missing: Vec<&str> = TOP_LEVEL_KEYS
            .iter()
            .copied()
            .filter(|key| value.get(key).is_none())
            .collect();

        let settings: Settings = serde_json::from_value(value).map_err(invalid)?;

        if !missing.is_empty() {
            warn!("Missing settings {:?}, filled in with defaults", missing);
            settings.save(path)?;
        }

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> ManagerResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ManagerError::io(parent, e))?;
        }
        std::fs::write(path, json).map_err(|e| ManagerError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let settings = Settings::load_or_create(&path).unwrap();

        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(Settings::load_or_create(&path).unwrap(), settings);
    }

    #[test]
    fn missing_keys_are_backfilled_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            r#"{ "flags": "-Xmx2G", "java": { "paths": { "17": "/opt/java17/bin/java" } } }"#,
        )
        .unwrap();

        let settings = Settings::load_or_create(&path).unwrap();

        assert_eq!(settings.flags, "-Xmx2G");
        assert_eq!(
            settings.java.paths,
            BTreeMap::from([(17, PathBuf::from("/opt/java17/bin/java"))])
        );
        assert_eq!(settings.java.default_major, DEFAULT_JAVA_MAJOR);
        assert_eq!(settings.clean, CleanSettings::default());

        let rewritten: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        for key in TOP_LEVEL_KEYS {
            assert!(rewritten.get(key).is_some(), "{key} not written back");
        }
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&path),
            Err(ManagerError::InvalidSettings { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn registry_uses_configured_table() {
        let settings = Settings::default();
        let registry = settings.java.registry();
        assert!(registry.lookup(11).is_some());
        assert_eq!(registry.compatibility().majors_for(16), &[11, 16]);
        assert_eq!(registry.compatibility().majors_for(18), &[16]);
    }

    #[test]
    fn server_file_name_follows_jar_convention() {
        let server = ServerSoftwareSettings::default();
        assert_eq!(server.file_name(), "Purpur-1.18.1.jar");
        let name = crate::core::version::JarName::parse(&server.file_name()).unwrap();
        assert_eq!(name.minecraft_version(), 18);
    }
}
