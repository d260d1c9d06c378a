use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::core::error::{ManagerError, ManagerResult};
use crate::core::java::JavaInstallation;
use crate::core::launch::ProcessLauncher;
use crate::core::layout::{JarFolder, ServerLayout, ACTIVE_PREFIX};

/// Where a record's jar currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationState {
    InVersionsFolder,
    InMainFolder,
    Missing,
}

/// Result of [`VersionRecord::prepare_for_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// The jar already occupied the active slot; nothing was moved.
    AlreadyPrepared,
    /// The jar was moved into the active slot at this path.
    Moved(PathBuf),
}

/// One runnable server jar bound to a Java installation.
///
/// `jar_path` is the jar's location inside the versions folder. While the
/// jar is active it lives at `<root>/active-<file name>` instead; the
/// record keeps pointing at the versions-folder path either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    title: String,
    minecraft_version: u32,
    jar_path: PathBuf,
    java: JavaInstallation,
}

impl VersionRecord {
    pub fn create(
        title: &str,
        minecraft_version: u32,
        jar_path: impl Into<PathBuf>,
        java: JavaInstallation,
    ) -> Self {
        Self {
            title: capitalize(title),
            minecraft_version,
            jar_path: jar_path.into(),
            java,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn minecraft_version(&self) -> u32 {
        self.minecraft_version
    }

    pub fn jar_path(&self) -> &Path {
        &self.jar_path
    }

    pub fn java(&self) -> &JavaInstallation {
        &self.java
    }

    pub fn file_name(&self) -> String {
        self.jar_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Server directory the jar belongs to (parent of the versions folder).
    pub fn layout(&self) -> ServerLayout {
        let root = self
            .jar_path
            .parent()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        ServerLayout::new(root)
    }

    pub fn active_path(&self) -> PathBuf {
        self.layout().active_path(&self.file_name())
    }

    /// Ask the filesystem where the jar is. Never cached.
    pub fn location_state(&self) -> ManagerResult<LocationState> {
        let layout = self.layout();
        let file_name = self.file_name();

        let active_name = format!("{ACTIVE_PREFIX}{file_name}");
        if layout.list_jars(JarFolder::Main)?.contains(&active_name) {
            return Ok(LocationState::InMainFolder);
        }
        if layout.list_jars(JarFolder::Versions)?.contains(&file_name) {
            return Ok(LocationState::InVersionsFolder);
        }
        Ok(LocationState::Missing)
    }

    pub fn move_to_main(&self) -> ManagerResult<()> {
        let target = self.active_path();
        debug!("Moving {:?} -> {:?}", self.jar_path, target);
        std::fs::rename(&self.jar_path, &target).map_err(|e| ManagerError::io(&self.jar_path, e))
    }

    pub fn move_to_versions(&self) -> ManagerResult<()> {
        let source = self.active_path();
        debug!("Moving {:?} -> {:?}", source, self.jar_path);
        std::fs::rename(&source, &self.jar_path).map_err(|e| ManagerError::io(source, e))
    }

    /// Put the jar into the active slot. Idempotent.
    #[instrument(skip(self), fields(jar = %self.file_name()))]
    pub fn prepare_for_run(&self) -> ManagerResult<PrepareOutcome> {
        match self.location_state()? {
            LocationState::InMainFolder => {
                info!("Already prepared version");
                Ok(PrepareOutcome::AlreadyPrepared)
            }
            LocationState::Missing => Err(ManagerError::JarNotFound(self.jar_path.clone())),
            LocationState::InVersionsFolder => {
                let target = self.active_path();
                let moved = self.move_to_main();
                if let Err(e) = &moved {
                    warn!("Could not move the jar into the active slot: {}", e);
                }
                if moved.is_err() || self.location_state()? != LocationState::InMainFolder {
                    return Err(ManagerError::MoveFailed {
                        from: self.jar_path.clone(),
                        to: target,
                    });
                }
                info!("Activated {:?}", target);
                Ok(PrepareOutcome::Moved(target))
            }
        }
    }

    /// `"<java>" <flags> -jar active-<file name> nogui`
    pub fn build_launch_command(&self, flags: &str) -> String {
        let java = format!("\"{}\"", self.java.executable().display());
        let jar = format!("{ACTIVE_PREFIX}{}", self.file_name());
        let flags = flags.trim();

        let mut parts = vec![java.as_str()];
        if !flags.is_empty() {
            parts.push(flags);
        }
        parts.extend(["-jar", jar.as_str(), "nogui"]);
        parts.join(" ")
    }

    /// Prepare the jar and hand the launch command to `launcher`.
    ///
    /// Nothing is launched if preparing fails.
    pub fn run(&self, flags: &str, launcher: &dyn ProcessLauncher) -> ManagerResult<()> {
        self.prepare_for_run()?;
        let command = self.build_launch_command(flags);
        info!("Delegating command: {}", command);
        launcher.launch(&command, self.layout().root())
    }

    pub fn describe(&self, simplified: bool) -> String {
        if simplified {
            format!(
                "1.{} {} / Java {}",
                self.minecraft_version,
                self.title,
                self.java.major()
            )
        } else {
            format!(
                "V: 1.{} {} / Java ({}): {} / Path: {}",
                self.minecraft_version,
                self.title,
                self.java.major(),
                self.java.executable().display(),
                self.jar_path.display()
            )
        }
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
