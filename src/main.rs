use anyhow::Result;
use clap::Parser;
use embcue::commands::{Cli, Commands};
use embcue::playlist::report::{list_playlists, scan_directory};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    let cli = Cli::parse();

    match cli.command {
        Commands::List(cmd) => list_playlists(cmd).await?,
        Commands::Scan(cmd) => scan_directory(pb, cmd).await?,
    }

    Ok(())
}
