// ─── Java Compatibility ───
// Which Java runtimes a given Minecraft server version is offered with.

use std::collections::BTreeMap;

/// Java major used for every Minecraft version without an explicit entry.
pub const DEFAULT_JAVA_MAJOR: u32 = 16;

/// 1.16 servers historically ran under either Java 11 or Java 16, so they
/// are listed once per runtime.
pub const LEGACY_DUAL_JAVA_VERSION: u32 = 16;
pub const LEGACY_DUAL_JAVA_MAJORS: [u32; 2] = [11, 16];

/// Maps a Minecraft minor version (`16` for "1.16") to the ordered list of
/// Java majors a record should be created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityTable {
    default_major: u32,
    overrides: BTreeMap<u32, Vec<u32>>,
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        Self::new(DEFAULT_JAVA_MAJOR, default_overrides())
    }
}

impl CompatibilityTable {
    /// Build a table. Entries with an empty major list are dropped so that
    /// every version resolves to at least one runtime.
    pub fn new(default_major: u32, overrides: BTreeMap<u32, Vec<u32>>) -> Self {
        let overrides = overrides
            .into_iter()
            .filter(|(_, majors)| !majors.is_empty())
            .collect();
        Self {
            default_major,
            overrides,
        }
    }

    /// Java majors for `minecraft_version`, in the order records are created.
    pub fn majors_for(&self, minecraft_version: u32) -> &[u32] {
        match self.overrides.get(&minecraft_version) {
            Some(majors) => majors,
            None => std::slice::from_ref(&self.default_major),
        }
    }
}

/// The built-in override table: only the legacy 1.16 dual-runtime rule.
pub fn default_overrides() -> BTreeMap<u32, Vec<u32>> {
    BTreeMap::from([(
        LEGACY_DUAL_JAVA_VERSION,
        LEGACY_DUAL_JAVA_MAJORS.to_vec(),
    )])
}
