use std::io::{BufRead, Write};
use std::time::Duration;

use tracing::{error, info, warn};

use crate::core::cleaner::{self, CleanReport};
use crate::core::console::Console;
use crate::core::downloader::{fetch_server_jar, FetchOutcome};
use crate::core::error::{ManagerError, ManagerResult};
use crate::core::launch::{BootLoop, ProcessLauncher};
use crate::core::plugins::{find_installed, Installer, PluginContext, PluginOutcome};
use crate::core::settings::{GitPluginSettings, InstallMode};
use crate::core::state::AppState;
use crate::core::version::JarName;

/// Options of the `run` command. `None` means "ask".
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub flags: Option<String>,
    pub clean: bool,
    pub looped: Option<bool>,
    /// Stop the boot loop after this many runs.
    pub max_runs: Option<usize>,
}

/// Clean (if wanted), recover the active slot, index the versions folder,
/// let the operator pick a version and start it once or in a boot loop.
pub async fn run_server<R: BufRead, W: Write>(
    state: &AppState,
    console: &mut Console<R, W>,
    launcher: &dyn ProcessLauncher,
    options: RunOptions,
) -> ManagerResult<()> {
    let settings = &state.settings;
    let root = state.layout.root();

    let wants_clean = if options.clean || settings.clean.enabled {
        true
    } else if settings.clean.ask_on_start {
        console.ask_yes_no("Would you like to clean?")?
    } else {
        false
    };
    if wants_clean {
        cleaner::clean(&settings.clean, root).await;
    }

    state.layout.ensure_dirs()?;
    if state.layout.ensure_eula()? {
        info!("Created eula.txt");
    }

    let mut collection = state.collection();
    collection.reclaim_active_version(false)?;
    let records = collection.index_versions()?;
    collection.add_all(records);

    let (record, looped) = match options.looped {
        Some(looped) => (collection.prompt_selection(console, true)?, looped),
        None => {
            let selection = collection.prompt_selection_with_loop(console)?;
            (selection.record, selection.looped)
        }
    };
    let flags = options.flags.as_deref().unwrap_or(&settings.flags);

    collection.activate(record)?;

    if looped {
        let mut boot_loop = BootLoop::new(Duration::from_secs(settings.reboot_delay_secs));
        if settings.clean.also_on_reboot {
            boot_loop = boot_loop.with_clean(settings.clean.clone());
        }
        if let Some(max_runs) = options.max_runs {
            boot_loop = boot_loop.with_max_runs(max_runs);
        }
        boot_loop.run(record, flags, launcher, root).await?;
    } else {
        record.run(flags, launcher)?;
    }
    Ok(())
}

/// Print every indexed version with full details, plus the active slot.
pub fn list_versions<R: BufRead, W: Write>(
    state: &AppState,
    console: &mut Console<R, W>,
) -> ManagerResult<()> {
    let collection = state.collection();
    let records = collection.index_versions()?;
    if records.is_empty() {
        console.say(format!(
            "No versions in {:?}",
            state.layout.versions_dir()
        ))?;
    }
    for (i, record) in records.iter().enumerate() {
        console.say(format!("{}: {}", i, record.describe(false)))?;
    }

    if let Some(active) = collection.find_active_jar()? {
        let file_name = active
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match JarName::parse_active(&file_name) {
            Some(Ok(name)) => console.say(format!(
                "Active: 1.{} {} ({})",
                name.minecraft_version(),
                name.title(),
                file_name
            ))?,
            _ => console.say(format!("Active: {file_name}"))?,
        }
    }
    Ok(())
}

/// Move a leftover active jar back into the versions folder.
pub fn reclaim<R: BufRead, W: Write>(
    state: &AppState,
    console: &mut Console<R, W>,
    reindex: bool,
) -> ManagerResult<()> {
    let mut collection = state.collection();
    match collection.reclaim_active_version(reindex)? {
        Some(path) => console.say(format!("Moved the active jar back to {}", path.display()))?,
        None => console.say("No active jar to reclaim")?,
    }
    for record in collection.iter() {
        console.say(format!("Recovered: {}", record.describe(true)))?;
    }
    Ok(())
}

pub async fn clean(state: &AppState) -> CleanReport {
    cleaner::clean(&state.settings.clean, state.layout.root()).await
}

pub async fn fetch_server(state: &AppState, force: bool) -> ManagerResult<FetchOutcome> {
    state.layout.ensure_dirs()?;
    fetch_server_jar(
        &state.downloader,
        &state.settings.server,
        &state.layout,
        force,
    )
    .await
}

/// Install every enabled plugin. A failing plugin does not stop the others;
/// the command fails at the end if any did.
pub async fn install_plugins<R: BufRead, W: Write>(
    state: &AppState,
    console: &mut Console<R, W>,
    update: bool,
) -> ManagerResult<Vec<(String, PluginOutcome)>> {
    state.layout.ensure_dirs()?;
    let plugins_dir = state.layout.plugins_dir();
    let ctx = PluginContext {
        server_root: state.layout.root(),
        plugins_dir: &plugins_dir,
        downloader: &state.downloader,
        update,
    };

    let mut installers = Vec::new();
    for plugin in state.settings.plugins.iter().filter(|p| p.enabled) {
        installers.push(Installer::from_url(plugin.clone()));
    }
    for plugin in state.settings.git_plugins.iter().filter(|p| p.enabled) {
        if should_build(plugin, &ctx, console)? {
            installers.push(Installer::from_git(plugin.clone()));
        } else {
            info!("Skipping {}", plugin.name);
        }
    }

    let mut installed = Vec::new();
    let mut failed = Vec::new();
    for installer in installers {
        match installer.install(&ctx).await {
            Ok(outcome) => installed.push((installer.name().to_string(), outcome)),
            Err(e) => {
                error!("Installing {} failed: {}", installer.name(), e);
                failed.push(installer.name().to_string());
            }
        }
    }

    if !failed.is_empty() {
        return Err(ManagerError::Other(format!(
            "Plugins failed to install: {}",
            failed.join(", ")
        )));
    }
    Ok(installed)
}

/// Resolve a git plugin's install mode, prompting in `ask` mode when the
/// plugin is not installed yet.
fn should_build<R: BufRead, W: Write>(
    plugin: &GitPluginSettings,
    ctx: &PluginContext<'_>,
    console: &mut Console<R, W>,
) -> ManagerResult<bool> {
    match plugin.install_mode {
        InstallMode::Build => Ok(true),
        InstallMode::Skip => Ok(false),
        InstallMode::Ask => {
            if !ctx.update && !find_installed(ctx.plugins_dir, &plugin.name)?.is_empty() {
                return Ok(true);
            }
            console.say(format!(
                "{} is not installed. Please enter how you wish to install {}:",
                plugin.name, plugin.name
            ))?;
            console.say("1. Build from the git repository (~5 to 10 minutes first time, ~1 minute after)")?;
            console.say(format!("2. Install {} manually (skip)", plugin.name))?;
            loop {
                match console.answer()?.as_str() {
                    "1" => return Ok(true),
                    "2" => return Ok(false),
                    other => {
                        warn!("Unknown choice '{}'", other);
                        console.say("Please enter 1 or 2")?;
                    }
                }
            }
        }
    }
}
