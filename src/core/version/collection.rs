use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::console::Console;
use crate::core::error::{ManagerError, ManagerResult};
use crate::core::java::JavaRegistry;
use crate::core::layout::{JarFolder, ServerLayout, ACTIVE_PREFIX};

use super::jar_name::JarName;
use super::record::{PrepareOutcome, VersionRecord};

/// Why a selection answer was rejected. Handled by re-prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSelection {
    NotNumeric,
    OutOfBounds,
}

/// Parse a selection answer against a list of `count` entries.
///
/// Accepts `0..count`; only plain ASCII digits count as numeric.
pub fn parse_selection(input: &str, count: usize) -> Result<usize, InvalidSelection> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(InvalidSelection::NotNumeric);
    }
    match input.parse::<usize>() {
        Ok(index) if index < count => Ok(index),
        _ => Err(InvalidSelection::OutOfBounds),
    }
}

/// A chosen record together with whether it should be rebooted in a loop.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub record: &'a VersionRecord,
    pub looped: bool,
}

/// The known versions of one server directory, in display order.
///
/// Owns the active-slot rules: at most one jar sits in the main folder
/// under the `active-` prefix.
pub struct VersionCollection {
    layout: ServerLayout,
    registry: JavaRegistry,
    versions: Vec<VersionRecord>,
}

impl VersionCollection {
    pub fn new(layout: ServerLayout, registry: JavaRegistry) -> Self {
        Self {
            layout,
            registry,
            versions: Vec::new(),
        }
    }

    pub fn layout(&self) -> &ServerLayout {
        &self.layout
    }

    pub fn add(&mut self, record: VersionRecord) {
        self.versions.push(record);
    }

    pub fn add_all(&mut self, records: impl IntoIterator<Item = VersionRecord>) {
        self.versions.extend(records);
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VersionRecord> {
        self.versions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionRecord> {
        self.versions.iter()
    }

    /// Records for one jar: one per Java major the compatibility table
    /// lists for its Minecraft version.
    pub fn records_for(&self, name: &JarName) -> ManagerResult<Vec<VersionRecord>> {
        let path = self.layout.stored_path(name.file_name());
        Ok(self
            .registry
            .installations_for(name.minecraft_version())?
            .into_iter()
            .map(|java| {
                VersionRecord::create(name.title(), name.minecraft_version(), path.clone(), java)
            })
            .collect())
    }

    /// Build records for every jar in the versions folder.
    ///
    /// Jars whose names do not follow the naming convention are skipped;
    /// a Java major missing from the registry fails the whole index.
    pub fn index_versions(&self) -> ManagerResult<Vec<VersionRecord>> {
        let mut records = Vec::new();
        for file_name in self.layout.list_jars(JarFolder::Versions)? {
            let name = match JarName::parse(&file_name) {
                Ok(name) => name,
                Err(e) => {
                    warn!("Skipping {}: {}", file_name, e);
                    continue;
                }
            };
            records.extend(self.records_for(&name)?);
        }
        debug!("Indexed {} version records", records.len());
        Ok(records)
    }

    /// The jar currently in the active slot, if any.
    ///
    /// More than one `active-` jar in the main folder is an error.
    pub fn find_active_jar(&self) -> ManagerResult<Option<PathBuf>> {
        let mut active: Vec<PathBuf> = self
            .layout
            .list_jars(JarFolder::Main)?
            .into_iter()
            .filter(|name| name.starts_with(ACTIVE_PREFIX))
            .map(|name| self.layout.root().join(name))
            .collect();

        match active.len() {
            0 => Ok(None),
            1 => Ok(active.pop()),
            _ => Err(ManagerError::MultipleActiveJars(active)),
        }
    }

    pub fn has_active_jar(&self) -> ManagerResult<bool> {
        Ok(self.find_active_jar()?.is_some())
    }

    /// Move the active jar back into the versions folder under its original
    /// name. Returns the restored path, or `None` when the slot was empty.
    /// A stored jar of the same name is never overwritten.
    pub fn release_active_slot(&self) -> ManagerResult<Option<PathBuf>> {
        let Some(active) = self.find_active_jar()? else {
            return Ok(None);
        };

        let file_name = active
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let original = file_name
            .strip_prefix(ACTIVE_PREFIX)
            .unwrap_or(&file_name)
            .to_string();
        let target = self.layout.stored_path(&original);

        if target.exists() {
            warn!("{:?} already exists, leaving {:?} in the active slot", target, active);
            return Err(ManagerError::MoveFailed {
                from: active,
                to: target,
            });
        }
        let versions_dir = self.layout.versions_dir();
        std::fs::create_dir_all(&versions_dir).map_err(|e| ManagerError::io(&versions_dir, e))?;
        std::fs::rename(&active, &target).map_err(|e| ManagerError::io(&active, e))?;

        info!("Moved {:?} back to {:?}", active, target);
        Ok(Some(target))
    }

    /// Startup recovery: empty the active slot left behind by an earlier run.
    ///
    /// With `reindex`, records for the recovered jar are rebuilt from its
    /// name and appended. Returns the restored path, if any.
    pub fn reclaim_active_version(&mut self, reindex: bool) -> ManagerResult<Option<PathBuf>> {
        let Some(target) = self.release_active_slot()? else {
            return Ok(None);
        };

        if reindex {
            let file_name = target
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match JarName::parse(&file_name) {
                Ok(name) => {
                    let records = self.records_for(&name)?;
                    self.add_all(records);
                }
                Err(e) => warn!("Not reindexing {}: {}", file_name, e),
            }
        }

        Ok(Some(target))
    }

    /// Put `record` into the active slot, first moving out any other jar
    /// that occupies it.
    pub fn activate(&self, record: &VersionRecord) -> ManagerResult<PrepareOutcome> {
        if let Some(active) = self.find_active_jar()? {
            if active != record.active_path() {
                self.release_active_slot()?;
            }
        }
        record.prepare_for_run()
    }

    /// Lowest and highest selectable index, for messages.
    pub fn selection_bounds(&self) -> (usize, usize) {
        (0, self.versions.len().saturating_sub(1))
    }

    pub fn print<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> ManagerResult<()> {
        for (i, version) in self.versions.iter().enumerate() {
            console.say(format!("{}: {}", i, version.describe(true)))?;
        }
        Ok(())
    }

    /// Ask for a version until a valid index is entered.
    pub fn prompt_selection<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        show_list: bool,
    ) -> ManagerResult<&VersionRecord> {
        if self.versions.is_empty() {
            return Err(ManagerError::NoVersions);
        }
        if show_list {
            self.print(console)?;
        }

        console.say("Please select a version from the list above")?;
        loop {
            let answer = console.answer()?;
            match parse_selection(&answer, self.versions.len()) {
                Ok(index) => return Ok(&self.versions[index]),
                Err(InvalidSelection::NotNumeric) => {
                    console.say("You entered a non-numerical value")?;
                }
                Err(InvalidSelection::OutOfBounds) => {
                    let (low, high) = self.selection_bounds();
                    console.say(format!(
                        "You selected a number out of bounds: [{low}, {high}]"
                    ))?;
                }
            }
            console.say("Please try again to select a version from the list above")?;
        }
    }

    pub fn prompt_loop_toggle<R: BufRead, W: Write>(
        console: &mut Console<R, W>,
    ) -> ManagerResult<bool> {
        console.ask_yes_no("Would you like to loop this version?")
    }

    pub fn prompt_selection_with_loop<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> ManagerResult<Selection<'_>> {
        let record = self.prompt_selection(console, true)?;
        let looped = Self::prompt_loop_toggle(console)?;
        Ok(Selection { record, looped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::java::{CompatibilityTable, JavaInstallation};
    use crate::core::version::LocationState;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    fn registry() -> JavaRegistry {
        JavaRegistry::new(
            BTreeMap::from([
                (11, PathBuf::from("/java11")),
                (16, PathBuf::from("/java16")),
            ]),
            CompatibilityTable::default(),
        )
    }

    fn server(jars: &[&str]) -> (tempfile::TempDir, VersionCollection) {
        let dir = tempfile::tempdir().unwrap();
        let layout = ServerLayout::new(dir.path());
        layout.ensure_dirs().unwrap();
        for jar in jars {
            std::fs::write(layout.stored_path(jar), b"jar").unwrap();
        }
        (dir, VersionCollection::new(layout, registry()))
    }

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn parse_selection_accepts_full_range() {
        assert_eq!(parse_selection("0", 3), Ok(0));
        assert_eq!(parse_selection("2", 3), Ok(2));
        assert_eq!(parse_selection("3", 3), Err(InvalidSelection::OutOfBounds));
        assert_eq!(parse_selection("-1", 3), Err(InvalidSelection::NotNumeric));
        assert_eq!(parse_selection("+1", 3), Err(InvalidSelection::NotNumeric));
        assert_eq!(parse_selection("one", 3), Err(InvalidSelection::NotNumeric));
        assert_eq!(parse_selection("", 3), Err(InvalidSelection::NotNumeric));
        assert_eq!(
            parse_selection("99999999999999999999999", 3),
            Err(InvalidSelection::OutOfBounds)
        );
    }

    #[test]
    fn index_builds_one_record_per_compatible_java() {
        let (_dir, collection) = server(&["Foo-1.12-server.jar", "Bar-1.16.jar", "purpur.jar"]);

        let records = collection.index_versions().unwrap();

        let summary: Vec<String> = records.iter().map(|r| r.describe(true)).collect();
        assert_eq!(
            summary,
            vec!["1.16 Bar / Java 11", "1.16 Bar / Java 16", "1.12 Foo / Java 16"]
        );
    }

    #[test]
    fn indexing_fails_when_java_is_missing() {
        let (dir, _) = server(&["Bar-1.16.jar"]);
        let registry = JavaRegistry::new(
            BTreeMap::from([(16, PathBuf::from("/java16"))]),
            CompatibilityTable::default(),
        );
        let collection = VersionCollection::new(ServerLayout::new(dir.path()), registry);

        assert!(matches!(
            collection.index_versions(),
            Err(ManagerError::JavaNotConfigured(11))
        ));
    }

    #[test]
    fn scenario_select_and_run_foo() {
        let (dir, mut collection) = server(&["Foo-1.12-server.jar"]);
        let records = collection.index_versions().unwrap();
        collection.add_all(records);
        assert_eq!(collection.len(), 1);

        let record = collection.get(0).unwrap();
        assert_eq!(record.title(), "Foo");
        assert_eq!(record.minecraft_version(), 12);
        assert_eq!(record.java().major(), 16);

        let launcher = crate::core::launch::testing::RecordingLauncher::default();
        let mut console = console("0\n");
        let selected = collection.prompt_selection(&mut console, true).unwrap();
        selected.run("-Xmx4G", &launcher).unwrap();

        assert_eq!(
            launcher.commands(),
            vec!["\"/java16\" -Xmx4G -jar active-Foo-1.12-server.jar nogui"]
        );
        assert!(dir.path().join("active-Foo-1.12-server.jar").exists());
    }

    #[test]
    fn find_active_jar_reports_single_match() {
        let (dir, collection) = server(&[]);
        assert_eq!(collection.find_active_jar().unwrap(), None);
        assert!(!collection.has_active_jar().unwrap());

        std::fs::write(dir.path().join("active-Foo-1.12.jar"), b"jar").unwrap();
        std::fs::write(dir.path().join("Other-1.12.jar"), b"jar").unwrap();

        assert_eq!(
            collection.find_active_jar().unwrap(),
            Some(dir.path().join("active-Foo-1.12.jar"))
        );
        assert!(collection.has_active_jar().unwrap());
    }

    #[test]
    fn multiple_active_jars_are_an_error() {
        let (dir, collection) = server(&[]);
        std::fs::write(dir.path().join("active-Foo-1.12.jar"), b"jar").unwrap();
        std::fs::write(dir.path().join("active-Bar-1.16.jar"), b"jar").unwrap();

        match collection.find_active_jar() {
            Err(ManagerError::MultipleActiveJars(paths)) => assert_eq!(paths.len(), 2),
            other => panic!("expected MultipleActiveJars, got {other:?}"),
        }
    }

    #[test]
    fn reclaim_without_reindex_only_moves() {
        let (dir, mut collection) = server(&[]);
        std::fs::write(dir.path().join("active-Bar-1.16-server.jar"), b"jar").unwrap();

        let restored = collection.reclaim_active_version(false).unwrap();

        let expected = dir.path().join("versions").join("Bar-1.16-server.jar");
        assert_eq!(restored, Some(expected.clone()));
        assert!(expected.exists());
        assert!(!dir.path().join("active-Bar-1.16-server.jar").exists());
        assert!(collection.is_empty());
    }

    #[test]
    fn reclaim_with_reindex_adds_both_legacy_records() {
        let (dir, mut collection) = server(&[]);
        std::fs::write(dir.path().join("active-Foo-1.16.jar"), b"jar").unwrap();

        collection.reclaim_active_version(true).unwrap();

        let expected = dir.path().join("versions").join("Foo-1.16.jar");
        let majors: Vec<u32> = collection.iter().map(|r| r.java().major()).collect();
        assert_eq!(majors, vec![11, 16]);
        assert!(collection.iter().all(|r| r.jar_path() == expected));
    }

    #[test]
    fn reclaim_with_reindex_adds_one_record_for_other_versions() {
        let (dir, mut collection) = server(&[]);
        std::fs::write(dir.path().join("active-Foo-1.12.jar"), b"jar").unwrap();

        collection.reclaim_active_version(true).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(0).unwrap().java().major(), 16);
    }

    #[test]
    fn reclaim_keeps_stored_jar_of_same_name() {
        let (dir, mut collection) = server(&["Bar-1.16.jar"]);
        let active = dir.path().join("active-Bar-1.16.jar");
        std::fs::write(&active, b"running").unwrap();

        assert!(matches!(
            collection.reclaim_active_version(true),
            Err(ManagerError::MoveFailed { .. })
        ));
        assert!(active.exists());
        assert_eq!(
            std::fs::read(collection.layout().stored_path("Bar-1.16.jar")).unwrap(),
            b"jar"
        );
        assert!(collection.is_empty());
    }

    #[test]
    fn reclaim_on_empty_slot_does_nothing() {
        let (_dir, mut collection) = server(&["Foo-1.12.jar"]);
        assert_eq!(collection.reclaim_active_version(true).unwrap(), None);
        assert!(collection.is_empty());
    }

    #[test]
    fn activate_swaps_out_the_previous_jar() {
        let (_dir, mut collection) = server(&["Foo-1.12.jar", "Bar-1.16.jar"]);
        let records = collection.index_versions().unwrap();
        collection.add_all(records);

        let bar = collection.get(0).unwrap();
        let foo = collection.get(2).unwrap();

        collection.activate(foo).unwrap();
        assert_eq!(foo.location_state().unwrap(), LocationState::InMainFolder);

        assert!(matches!(
            collection.activate(bar).unwrap(),
            PrepareOutcome::Moved(_)
        ));
        assert_eq!(foo.location_state().unwrap(), LocationState::InVersionsFolder);
        assert_eq!(bar.location_state().unwrap(), LocationState::InMainFolder);
        assert_eq!(
            collection.find_active_jar().unwrap(),
            Some(bar.active_path())
        );

        assert_eq!(
            collection.activate(bar).unwrap(),
            PrepareOutcome::AlreadyPrepared
        );
    }

    #[test]
    fn prompt_selection_retries_until_valid() {
        let (_dir, mut collection) = server(&["Foo-1.12.jar", "Bar-1.16.jar"]);
        let records = collection.index_versions().unwrap();
        collection.add_all(records);

        let mut console = console("abc\n7\n2\n");
        let record = collection.prompt_selection(&mut console, true).unwrap();
        assert_eq!(record.title(), "Foo");

        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.starts_with("0: 1.16 Bar / Java 11\n1: 1.16 Bar / Java 16\n2: 1.12 Foo / Java 16\n"));
        assert!(output.contains("You entered a non-numerical value"));
        assert!(output.contains("You selected a number out of bounds: [0, 2]"));
        assert_eq!(
            output
                .matches("Please try again to select a version from the list above")
                .count(),
            2
        );
    }

    #[test]
    fn prompt_selection_never_returns_without_valid_input() {
        let (_dir, mut collection) = server(&["Foo-1.12.jar"]);
        let records = collection.index_versions().unwrap();
        collection.add_all(records);

        let mut console = console("x\n5\n-1\n");
        assert!(matches!(
            collection.prompt_selection(&mut console, false),
            Err(ManagerError::InputClosed)
        ));
    }

    #[test]
    fn prompt_selection_asks_again_after_garbled_input() {
        let (_dir, mut collection) = server(&["Foo-1.12.jar"]);
        let records = collection.index_versions().unwrap();
        collection.add_all(records);

        let mut console = Console::new(Cursor::new(b"\xff\xfe\n 0\n0\n".to_vec()), Vec::new());
        let record = collection.prompt_selection(&mut console, false).unwrap();
        assert_eq!(record.title(), "Foo");

        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output.matches("You entered a non-numerical value").count(), 2);
    }

    #[test]
    fn prompt_selection_on_empty_collection_fails() {
        let (_dir, collection) = server(&[]);
        let mut console = console("0\n");
        assert!(matches!(
            collection.prompt_selection(&mut console, true),
            Err(ManagerError::NoVersions)
        ));
    }

    #[test]
    fn selection_with_loop_reads_both_answers() {
        let (_dir, mut collection) = server(&["Foo-1.12.jar"]);
        let java = JavaInstallation::create(16, &registry()).unwrap();
        let path = collection.layout().stored_path("Foo-1.12.jar");
        collection.add(VersionRecord::create("Foo", 12, path, java));

        let mut console = console("0\nperhaps\nYes\n");
        let selection = collection.prompt_selection_with_loop(&mut console).unwrap();
        assert_eq!(selection.record.title(), "Foo");
        assert!(selection.looped);
    }

    #[test]
    fn selection_bounds_are_inclusive() {
        let (_dir, mut collection) = server(&["Foo-1.12.jar", "Bar-1.12.jar"]);
        assert_eq!(collection.selection_bounds(), (0, 0));
        let records = collection.index_versions().unwrap();
        collection.add_all(records);
        assert_eq!(collection.selection_bounds(), (0, 1));
    }
}
