pub mod cli;
pub mod commands;
pub mod core;

use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::RunOptions;
use crate::core::console::Console;
use crate::core::downloader::FetchOutcome;
use crate::core::error::ManagerResult;
use crate::core::launch::ShellLauncher;
use crate::core::plugins::PluginOutcome;
use crate::core::state::AppState;

fn init_tracing(debug: bool) {
    let fallback = if debug {
        "info,servermanager_lib=debug"
    } else {
        "info"
    };
    // A second init (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point behind the `servermanager` binary.
pub async fn run(cli: Cli) -> ManagerResult<()> {
    init_tracing(cli.debug);
    tracing::info!("ServerManager starting in {:?}", cli.dir);

    let state = AppState::load(&cli.dir, cli.config)?;
    let mut console = Console::stdio();

    match cli.command.unwrap_or_default() {
        Command::Run {
            flags,
            clean,
            looped,
            no_loop,
        } => {
            let looped = match (looped, no_loop) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let options = RunOptions {
                flags,
                clean,
                looped,
                max_runs: None,
            };
            commands::run_server(&state, &mut console, &ShellLauncher, options).await
        }
        Command::List => commands::list_versions(&state, &mut console),
        Command::Reclaim { reindex } => commands::reclaim(&state, &mut console, reindex),
        Command::Clean => {
            let report = commands::clean(&state).await;
            console.say(format!(
                "Removed {} folders and {} files ({} failures)",
                report.folders_removed, report.files_removed, report.failures
            ))
        }
        Command::FetchServer { force } => match commands::fetch_server(&state, force).await? {
            FetchOutcome::AlreadyPresent(path) => {
                console.say(format!("Already present: {}", path.display()))
            }
            FetchOutcome::Downloaded(path) => {
                console.say(format!("Downloaded {}", path.display()))
            }
        },
        Command::Plugins { update } => {
            for (name, outcome) in commands::install_plugins(&state, &mut console, update).await? {
                match outcome {
                    PluginOutcome::AlreadyInstalled(files) => {
                        console.say(format!("{name}: already installed ({})", files.join(", ")))?
                    }
                    PluginOutcome::Installed(path) => {
                        console.say(format!("{name}: installed {}", path.display()))?
                    }
                }
            }
            Ok(())
        }
    }
}
