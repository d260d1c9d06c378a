
use crate::core::error::{ManagerError, ManagerResult};
use crate::core::layout::ACTIVE_PREFIX;

/// A server jar file name following `<title>-1.<minecraft>[...].jar`.
///
/// The title is everything before the first `-`; the Minecraft version is
/// the second dot-separated token of the second `-` segment, so
/// `Paper-1.16.5-794.jar` has title `Paper` and version `16`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarName {
    file_name: String,
    title: String,
    minecraft_version: u32,
}

impl JarName {
    pub fn parse(file_name: &str) -> ManagerResult<Self> {
        let invalid = |reason: &str| ManagerError::InvalidJarName {
            name: file_name.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = file_name.split('-');
        let title = segments.next().unwrap_or_default();
        if title.is_empty() {
            return Err(invalid("missing title before '-'"));
        }

        let version_segment = segments
            .next()
            .ok_or_else(|| invalid("missing '-<version>' segment"))?;
        let minor = version_segment
            .split('.')
            .nth(1)
            .ok_or_else(|| invalid("version has no minor component"))?;
        if minor.is_empty() || !minor.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("minor version is not a number"));
        }
        let minecraft_version = minor
            .parse()
            .map_err(|_| invalid("minor version is out of range"))?;

        Ok(Self {
            file_name: file_name.to_string(),
            title: title.to_string(),
            minecraft_version,
        })
    }

    /// Parse the name of a jar in the active slot, dropping the prefix.
    ///
    /// Returns `None` when `file_name` is not an active-slot name.
    pub fn parse_active(file_name: &str) -> Option<ManagerResult<Self>> {
        file_name.strip_prefix(ACTIVE_PREFIX).map(Self::parse)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn minecraft_version(&self) -> u32 {
        self.minecraft_version
    }
}
