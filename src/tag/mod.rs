//! Tag readers that surface a file's metadata as plain key/value pairs.
//!
//! Two passes exist:
//! - the *native* pass reads only the tag storage that belongs to the
//!   container (Vorbis comments in FLAC and Ogg, `ilst` items in MP4,
//!   ID3v2 in MP3, APEv2 in Monkey's Audio / WavPack)
//! - the *generic* pass ignores the container and looks for APEv2 and
//!   ID3v2 tags on any file

use crate::tag::error::TagResult;
use log::{debug, trace};
use std::path::Path;

pub mod ape;
pub mod container;
pub mod error;
pub mod id3v2;
pub mod vorbis;

/// Receives every key/value pair a tag reader finds.
pub trait TagHandler {
    fn on_pair(&mut self, key: &str, value: &str);
}

/// Source of tag pairs for a file.
pub trait TagScanner {
    /// Reads the container's own tag frames.
    fn scan_native(&self, path: &Path, handler: &mut dyn TagHandler) -> TagResult<()>;

    /// Reads container-agnostic tags (APEv2, ID3v2).
    fn scan_generic(&self, path: &Path, handler: &mut dyn TagHandler) -> TagResult<()>;
}

/// Reads tags straight from the file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTagScanner;

impl TagScanner for FileTagScanner {
    fn scan_native(&self, path: &Path, handler: &mut dyn TagHandler) -> TagResult<()> {
        let suffix = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match suffix.as_str() {
            "flac" => vorbis::scan_flac_tags(path, handler),
            "ogg" | "oga" | "mp4" | "mp4a" | "m4a" | "m4b" => {
                container::scan_container_tags(path, handler)
            }
            "mp3" | "mp2" => id3v2::scan_id3_tags(path, handler),
            "ape" | "wv" | "mpc" => ape::scan_ape_tags(path, handler),
            _ => {
                trace!("No native tag reader for {path:?}");
                Ok(())
            }
        }
    }

    fn scan_generic(&self, path: &Path, handler: &mut dyn TagHandler) -> TagResult<()> {
        // a broken APE tag must not hide an intact ID3 tag
        if let Err(err) = ape::scan_ape_tags(path, handler) {
            debug!("Skipping unreadable APE tag of {path:?}: {err}");
        }
        id3v2::scan_id3_tags(path, handler)
    }
}
