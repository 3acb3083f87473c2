use crate::playlist::embedded_cue::LocatorOptions;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Eq, PartialEq)]
pub struct OutputArgs {
    /// Print the playlists as JSON instead of a track listing
    #[arg(long, short = 'j', default_value_t = false)]
    pub json: bool,

    /// Only look at the container's own tags, skip the generic APE/ID3 fallback
    #[arg(long, default_value_t = false)]
    pub no_generic: bool,
}

impl OutputArgs {
    pub fn locator_options(&self) -> LocatorOptions {
        LocatorOptions {
            generic_fallback: !self.no_generic,
        }
    }
}

/// Prints the playlist embedded in one or more music files.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct ListCommand {
    /// Music files carrying a CUESHEET tag
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Recursively searches a directory for music files with an embedded cue sheet.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct ScanCommand {
    /// Directory to search
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// How many files are read at the same time
    #[arg(long, short = 'J', value_name = "JOBS", default_value_t = 4)]
    pub jobs: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}
