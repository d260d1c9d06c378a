use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{ManagerError, ManagerResult};

use super::compatibility::CompatibilityTable;

/// A configured Java runtime: a major version bound to an executable.
///
/// Only obtainable through [`JavaInstallation::create`], so a value always
/// refers to a major version that exists in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstallation {
    major: u32,
    executable: PathBuf,
}

impl JavaInstallation {
    /// Look up `major` in `registry`.
    pub fn create(major: u32, registry: &JavaRegistry) -> ManagerResult<Self> {
        let executable = registry
            .lookup(major)
            .ok_or(ManagerError::JavaNotConfigured(major))?;
        Ok(Self {
            major,
            executable: executable.to_path_buf(),
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

/// Java major version → executable path, plus the compatibility rules used
/// when building records for a Minecraft version.
#[derive(Debug, Clone, Default)]
pub struct JavaRegistry {
    paths: BTreeMap<u32, PathBuf>,
    compatibility: CompatibilityTable,
}

impl JavaRegistry {
    pub fn new(paths: BTreeMap<u32, PathBuf>, compatibility: CompatibilityTable) -> Self {
        Self {
            paths,
            compatibility,
        }
    }

    pub fn lookup(&self, major: u32) -> Option<&Path> {
        self.paths.get(&major).map(PathBuf::as_path)
    }

    pub fn compatibility(&self) -> &CompatibilityTable {
        &self.compatibility
    }

    /// One installation per compatible Java major for `minecraft_version`.
    ///
    /// Fails on the first major that is not configured.
    pub fn installations_for(&self, minecraft_version: u32) -> ManagerResult<Vec<JavaInstallation>> {
        let majors = self.compatibility.majors_for(minecraft_version);
        debug!("Minecraft 1.{} runs with Java {:?}", minecraft_version, majors);
        majors
            .iter()
            .map(|major| JavaInstallation::create(*major, self))
            .collect()
    }
}
