use crate::commands::playlist::{ListCommand, ScanCommand};
use clap::{Parser, Subcommand};

pub mod playlist;

/// CLI for listing the playlists embedded in the CUESHEET tag of music files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    List(ListCommand),
    Scan(ScanCommand),
}
