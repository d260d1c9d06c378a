pub mod client;
pub mod server_jar;

pub use client::Downloader;
pub use server_jar::{fetch_server_jar, FetchOutcome};
