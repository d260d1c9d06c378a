pub mod boot_loop;
pub mod process;

pub use boot_loop::BootLoop;
pub use process::{ProcessLauncher, ShellLauncher};

#[cfg(test)]
pub mod testing {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use crate::core::error::ManagerResult;

    use super::ProcessLauncher;

    /// Records every command line instead of running it.
    #[derive(Default)]
    pub struct RecordingLauncher {
        launched: Mutex<Vec<(String, PathBuf)>>,
    }

    impl RecordingLauncher {
        pub fn commands(&self) -> Vec<String> {
            self.launched
                .lock()
                .unwrap()
                .iter()
                .map(|(command, _)| command.clone())
                .collect()
        }

        pub fn working_dirs(&self) -> Vec<PathBuf> {
            self.launched
                .lock()
                .unwrap()
                .iter()
                .map(|(_, dir)| dir.clone())
                .collect()
        }
    }

    impl ProcessLauncher for RecordingLauncher {
        fn launch(&self, command_line: &str, working_dir: &Path) -> ManagerResult<()> {
            self.launched
                .lock()
                .unwrap()
                .push((command_line.to_string(), working_dir.to_path_buf()));
            Ok(())
        }
    }
}
