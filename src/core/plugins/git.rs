// ─── Git Plugins ───
// Plugins built from source: clone/pull the repository, run the gradle
// wrapper, move the produced jar into the plugins folder.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::core::error::{ManagerError, ManagerResult};
use crate::core::settings::GitPluginSettings;

use super::installer::{existing_install, PluginContext, PluginInstaller, PluginOutcome};

/// Marker left by the CraftBukkit build tools once `gradlew setup` has run.
const BUILDTOOLS_MARKER: &str = "build/buildtools/CraftBukkit";
const BUILD_OUTPUT_DIR: &str = "build/libs";

pub struct GitPluginInstaller {
    settings: GitPluginSettings,
}

impl GitPluginInstaller {
    pub fn new(settings: GitPluginSettings) -> Self {
        Self { settings }
    }

    fn repo_dir(&self, server_root: &Path) -> PathBuf {
        server_root.join(&self.settings.repo_path)
    }

    /// Clone the repository if needed, then check out the branch and pull.
    async fn sync_repo(&self, repo_dir: &Path) -> ManagerResult<()> {
        if !repo_dir.join(".git").is_dir() {
            if let Some(parent) = repo_dir.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ManagerError::io(parent, e))?;
            }
            info!("Cloning {} into {:?}", self.settings.repo_url, repo_dir);
            let mut clone = Command::new("git");
            clone
                .arg("clone")
                .arg(&self.settings.repo_url)
                .arg(repo_dir);
            run_checked(clone, "git clone").await?;
        }

        let mut checkout = Command::new("git");
        checkout
            .arg("checkout")
            .arg(&self.settings.repo_branch)
            .current_dir(repo_dir);
        run_checked(checkout, "git checkout").await?;
        info!("Checked out {}", self.settings.repo_branch);

        let mut pull = Command::new("git");
        pull.arg("pull")
            .arg("origin")
            .arg(&self.settings.repo_branch)
            .current_dir(repo_dir);
        run_checked(pull, "git pull").await?;
        info!("Pulled latest changes");
        Ok(())
    }

    async fn build(&self, repo_dir: &Path) -> ManagerResult<()> {
        if !repo_dir.join(BUILDTOOLS_MARKER).is_dir() {
            warn!(
                "CraftBukkit build tools not found under {:?}, running gradle setup",
                repo_dir
            );
            run_checked(gradle_command(repo_dir, "setup"), "gradlew setup").await?;
        }
        run_checked(
            gradle_command(repo_dir, &self.settings.name),
            &format!("gradlew {}", self.settings.name),
        )
        .await
    }
}

#[async_trait]
impl PluginInstaller for GitPluginInstaller {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn install(&self, ctx: &PluginContext<'_>) -> ManagerResult<PluginOutcome> {
        if let Some(outcome) = existing_install(ctx, &self.settings.name)? {
            return Ok(outcome);
        }

        let repo_dir = self.repo_dir(ctx.server_root);
        self.sync_repo(&repo_dir).await?;
        self.build(&repo_dir).await?;

        let built = built_jar(&repo_dir)?;
        let file_name = built
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        tokio::fs::create_dir_all(ctx.plugins_dir)
            .await
            .map_err(|e| ManagerError::io(ctx.plugins_dir, e))?;
        let dest = ctx.plugins_dir.join(&file_name);
        tokio::fs::rename(&built, &dest)
            .await
            .map_err(|e| ManagerError::io(&built, e))?;

        info!("Moved {} to plugins folder", file_name);
        Ok(PluginOutcome::Installed(dest))
    }
}

/// First jar (by name) in the repository's build output folder.
pub fn built_jar(repo_dir: &Path) -> ManagerResult<PathBuf> {
    let libs = repo_dir.join(BUILD_OUTPUT_DIR);
    let entries = std::fs::read_dir(&libs).map_err(|e| ManagerError::io(&libs, e))?;

    let mut jars: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "jar"))
        .collect();
    jars.sort();

    jars.into_iter().next().ok_or_else(|| {
        ManagerError::Other(format!(
            "No jar in {:?}; make sure the build task was successful",
            libs
        ))
    })
}

fn gradle_command(repo_dir: &Path, task: &str) -> Command {
    let wrapper = if cfg!(target_os = "windows") {
        repo_dir.join("gradlew.bat")
    } else {
        repo_dir.join("gradlew")
    };
    let mut cmd = Command::new(wrapper);
    cmd.arg(task).current_dir(repo_dir);
    cmd
}

async fn run_checked(mut cmd: Command, program: &str) -> ManagerResult<()> {
    debug!("Running {:?}", cmd);
    let output = cmd.output().await.map_err(|e| ManagerError::CommandFailed {
        program: program.to_string(),
        detail: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(ManagerError::CommandFailed {
            program: program.to_string(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::downloader::Downloader;
    use crate::core::settings::InstallMode;

    fn iris() -> GitPluginInstaller {
        GitPluginInstaller::new(GitPluginSettings {
            name: "Iris".into(),
            enabled: true,
            repo_url: "https://example.invalid/Iris.git".into(),
            repo_branch: "master".into(),
            repo_path: "plugins/Iris/repo".into(),
            install_mode: InstallMode::Build,
        })
    }

    #[test]
    fn built_jar_picks_first_jar() {
        let dir = tempfile::tempdir().unwrap();
        let libs = dir.path().join(BUILD_OUTPUT_DIR);
        std::fs::create_dir_all(&libs).unwrap();
        std::fs::write(libs.join("Iris-3.1.jar"), b"").unwrap();
        std::fs::write(libs.join("Iris-3.0.jar"), b"").unwrap();
        std::fs::write(libs.join("build.log"), b"").unwrap();

        assert_eq!(built_jar(dir.path()).unwrap(), libs.join("Iris-3.0.jar"));
    }

    #[test]
    fn built_jar_requires_build_output() {
        let dir = tempfile::tempdir().unwrap();
        assert!(built_jar(dir.path()).is_err());

        std::fs::create_dir_all(dir.path().join(BUILD_OUTPUT_DIR)).unwrap();
        assert!(matches!(
            built_jar(dir.path()),
            Err(ManagerError::Other(_))
        ));
    }

    #[tokio::test]
    async fn installed_plugin_skips_git() {
        let dir = tempfile::tempdir().unwrap();
        let plugins = dir.path().join("plugins");
        std::fs::create_dir_all(&plugins).unwrap();
        std::fs::write(plugins.join("Iris-3.0.jar"), b"").unwrap();
        let downloader = Downloader::new().unwrap();
        let ctx = PluginContext {
            server_root: dir.path(),
            plugins_dir: &plugins,
            downloader: &downloader,
            update: false,
        };

        let outcome = iris().install(&ctx).await.unwrap();

        assert_eq!(
            outcome,
            PluginOutcome::AlreadyInstalled(vec!["Iris-3.0.jar".into()])
        );
        assert!(!dir.path().join("plugins/Iris/repo").exists());
    }

    #[test]
    fn repo_dir_is_relative_to_server_root() {
        assert_eq!(
            iris().repo_dir(Path::new("/srv/mc")),
            PathBuf::from("/srv/mc/plugins/Iris/repo")
        );
    }
}
