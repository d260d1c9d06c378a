use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Manage and run local Minecraft server jars.
#[derive(Parser, Debug)]
#[command(name = "servermanager", version, about)]
pub struct Cli {
    /// Server directory (holds the active jar, `versions/` and `plugins/`)
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Settings file [default: <dir>/servermanager.json]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select a version and start it (default)
    Run {
        /// JVM flags, overriding the settings file
        #[arg(long, allow_hyphen_values = true)]
        flags: Option<String>,

        /// Clean before starting without asking
        #[arg(long)]
        clean: bool,

        /// Reboot the server after it stops, without asking
        #[arg(long = "loop", conflicts_with = "no_loop")]
        looped: bool,

        /// Run once, without asking
        #[arg(long)]
        no_loop: bool,
    },
    /// List the versions found in the versions folder
    List,
    /// Move a leftover active jar back into the versions folder
    Reclaim {
        /// Also print the records rebuilt for it
        #[arg(long)]
        reindex: bool,
    },
    /// Delete the configured server folders and files
    Clean,
    /// Download the configured server jar into the versions folder
    FetchServer {
        /// Download even if the jar is already present
        #[arg(long)]
        force: bool,
    },
    /// Install the configured plugins
    Plugins {
        /// Replace plugins that are already installed
        #[arg(short, long)]
        update: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Run {
            flags: None,
            clean: false,
            looped: false,
            no_loop: false,
        }
    }
}
