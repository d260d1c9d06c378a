// ─── Boot Loop ───
// Keeps a selected version running: launch, wait, optionally clean, reboot.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::core::cleaner;
use crate::core::error::ManagerResult;
use crate::core::settings::CleanSettings;
use crate::core::version::VersionRecord;

use super::ProcessLauncher;

pub struct BootLoop {
    reboot_delay: Duration,
    /// Cleaned between runs when set.
    clean: Option<CleanSettings>,
    /// Stop after this many runs. `None` reboots until interrupted.
    max_runs: Option<usize>,
}

impl BootLoop {
    pub fn new(reboot_delay: Duration) -> Self {
        Self {
            reboot_delay,
            clean: None,
            max_runs: None,
        }
    }

    pub fn with_clean(mut self, clean: CleanSettings) -> Self {
        self.clean = Some(clean);
        self
    }

    pub fn with_max_runs(mut self, runs: usize) -> Self {
        self.max_runs = Some(runs);
        self
    }

    /// Run `record` repeatedly. Returns the number of completed runs once
    /// `max_runs` is reached; any launch error ends the loop.
    pub async fn run(
        &self,
        record: &VersionRecord,
        flags: &str,
        launcher: &dyn ProcessLauncher,
        root: &Path,
    ) -> ManagerResult<usize> {
        let mut runs = 0;
        loop {
            record.run(flags, launcher)?;
            runs += 1;

            if self.max_runs.is_some_and(|max| runs >= max) {
                return Ok(runs);
            }

            info!(
                "Server stopped. Rebooting in {} seconds. Press CTRL+C to cancel.",
                self.reboot_delay.as_secs()
            );
            if let Some(clean) = &self.clean {
                cleaner::clean(clean, root).await;
            }
            tokio::time::sleep(self.reboot_delay).await;
        }
    }
}
