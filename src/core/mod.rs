// ─── ServerManager Core ───
// Local Minecraft server-jar manager.
//
// Architecture:
//   core/
//     version/    - Jar naming, version records, the version collection
//     java/       - Java registry + version compatibility table
//     launch/     - Process launcher + boot loop
//     downloader/ - Streaming downloads with SHA-1 validation
//     plugins/    - URL and git/gradle plugin installers
//     state/      - Per-server application state
//     settings    - servermanager.json

pub mod cleaner;
pub mod console;
pub mod downloader;
pub mod error;
pub mod java;
pub mod launch;
pub mod layout;
pub mod plugins;
pub mod settings;
pub mod state;
pub mod version;
