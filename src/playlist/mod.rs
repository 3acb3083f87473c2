use crate::cue::models::Song;
use crate::playlist::embedded_cue::{EmbeddedCuePlaylist, LocatorOptions};
use std::path::Path;

pub mod embedded_cue;
pub mod report;

pub type SongEnumerator = Box<dyn Iterator<Item = Song> + Send>;

/// A way of turning a path into a list of songs.
#[derive(Debug, Clone, Copy)]
pub struct PlaylistPlugin {
    pub name: &'static str,
    pub suffixes: &'static [&'static str],
    pub open_path: fn(&Path, LocatorOptions) -> Option<SongEnumerator>,
}

impl PlaylistPlugin {
    pub fn supports_suffix(&self, suffix: &str) -> bool {
        self.suffixes.iter().any(|s| s.eq_ignore_ascii_case(suffix))
    }

    pub fn supports_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|suffix| self.supports_suffix(suffix))
    }

    pub fn open(&self, path: &Path, options: LocatorOptions) -> Option<SongEnumerator> {
        (self.open_path)(path, options)
    }
}

pub const EMBEDDED_CUE_PLAYLIST_PLUGIN: PlaylistPlugin = PlaylistPlugin {
    name: "embcue",
    // codecs known to carry CUESHEET tags, there are probably many more
    suffixes: &["flac", "mp3", "mp2", "mp4", "mp4a", "m4b", "ape", "wv", "ogg", "oga"],
    open_path: open_embedded_cue,
};

fn open_embedded_cue(path: &Path, options: LocatorOptions) -> Option<SongEnumerator> {
    let playlist =
        EmbeddedCuePlaylist::try_open_with(&crate::tag::FileTagScanner, path, options)?;
    Some(Box::new(playlist))
}
