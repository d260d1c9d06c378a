use clap::Parser;

use servermanager_lib::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = servermanager_lib::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
