// ─── Server Layout ───
// Folder structure of a server directory and the jar scanner over it.

use std::path::{Path, PathBuf};

use crate::core::error::{ManagerError, ManagerResult};

/// Prefix that marks the jar occupying the active slot in the main folder.
pub const ACTIVE_PREFIX: &str = "active-";

const VERSIONS_DIR: &str = "versions";
const PLUGINS_DIR: &str = "plugins";
const EULA_FILE: &str = "eula.txt";

/// Which folder a jar scan looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JarFolder {
    /// `<root>/versions/`, where inactive jars are stored.
    Versions,
    /// `<root>/`, where the active jar lives.
    Main,
}

/// A server directory:
/// - `<root>/`          - working directory of the server, holds the active jar
/// - `<root>/versions/` - every jar that is not currently active
/// - `<root>/plugins/`  - plugin jars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    root: PathBuf,
}

impl ServerLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join(VERSIONS_DIR)
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join(PLUGINS_DIR)
    }

    pub fn eula_path(&self) -> PathBuf {
        self.root.join(EULA_FILE)
    }

    pub fn folder(&self, folder: JarFolder) -> PathBuf {
        match folder {
            JarFolder::Versions => self.versions_dir(),
            JarFolder::Main => self.root.clone(),
        }
    }

    /// Where `file_name` sits while it occupies the active slot.
    pub fn active_path(&self, file_name: &str) -> PathBuf {
        self.root.join(format!("{ACTIVE_PREFIX}{file_name}"))
    }

    /// Where `file_name` is stored while inactive.
    pub fn stored_path(&self, file_name: &str) -> PathBuf {
        self.versions_dir().join(file_name)
    }

    /// Jar file names in `folder`, sorted. A missing folder has no jars.
    pub fn list_jars(&self, folder: JarFolder) -> ManagerResult<Vec<String>> {
        let dir = self.folder(folder);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ManagerError::io(dir, e)),
        };

        let mut jars = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ManagerError::io(&dir, e))?;
            let is_file = entry
                .file_type()
                .map(|t| t.is_file())
                .map_err(|e| ManagerError::io(entry.path(), e))?;
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                if name.ends_with(".jar") {
                    jars.push(name);
                }
            }
        }
        jars.sort();
        Ok(jars)
    }

    /// Create the versions and plugins folders if they are missing.
    pub fn ensure_dirs(&self) -> ManagerResult<()> {
        for dir in [self.versions_dir(), self.plugins_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| ManagerError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Write `eula=true` unless an `eula.txt` already exists.
    ///
    /// Returns whether the file was created.
    pub fn ensure_eula(&self) -> ManagerResult<bool> {
        let path = self.eula_path();
        if path.is_file() {
            return Ok(false);
        }
        std::fs::write(&path, "eula=true").map_err(|e| ManagerError::io(&path, e))?;
        Ok(true)
    }
}
