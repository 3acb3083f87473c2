//! Playlist built from the `CUESHEET` tag of a single music file.
//!
//! The sheet describes the file it is stored in, so every song it yields
//! points back at that file whatever its `FILE` commands say.

use crate::cue::CueParser;
use crate::cue::models::Song;
use crate::tag::{FileTagScanner, TagHandler, TagScanner};
use log::{debug, warn};
use std::iter::FusedIterator;
use std::ops::Range;
use std::path::Path;

const CUESHEET_KEY: &str = "cuesheet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Retry with the generic tag readers when the container's own tags
    /// carry no cue sheet
    pub generic_fallback: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            generic_fallback: true,
        }
    }
}

/// Keeps the first non-empty `CUESHEET` value it is handed.
#[derive(Debug, Default)]
pub struct ExtractCuesheet {
    cuesheet: String,
}

impl ExtractCuesheet {
    pub fn is_empty(&self) -> bool {
        self.cuesheet.is_empty()
    }

    pub fn into_inner(self) -> Option<String> {
        if self.cuesheet.is_empty() {
            None
        } else {
            Some(self.cuesheet)
        }
    }
}

impl TagHandler for ExtractCuesheet {
    fn on_pair(&mut self, key: &str, value: &str) {
        if self.cuesheet.is_empty() && key.eq_ignore_ascii_case(CUESHEET_KEY) {
            self.cuesheet = value.to_string();
        }
    }
}

/// Finds the embedded cue sheet of `path`: the container's native tags
/// first, the generic readers only if those had nothing.
pub fn locate_cuesheet(
    scanner: &dyn TagScanner,
    path: &Path,
    options: LocatorOptions,
) -> Option<String> {
    let mut extract = ExtractCuesheet::default();

    if let Err(err) = scanner.scan_native(path, &mut extract) {
        debug!("Native tag scan of {path:?} failed: {err}");
    }

    if extract.is_empty() && options.generic_fallback {
        if let Err(err) = scanner.scan_generic(path, &mut extract) {
            debug!("Generic tag scan of {path:?} failed: {err}");
        }
    }

    extract.into_inner()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Lines left to feed; drain the parser before feeding the next one
    Feeding,
    /// All lines fed and `finish` sent, drain what is left
    Finishing,
    Done,
}

/// Lazily turns an embedded cue sheet into songs.
#[derive(Debug)]
pub struct EmbeddedCuePlaylist {
    /// Overrides every `FILE` of the sheet
    filename: String,
    cuesheet: String,
    /// Start of the next unconsumed line in `cuesheet`
    next: usize,
    parser: CueParser,
    state: State,
}

impl EmbeddedCuePlaylist {
    /// Opens the embedded playlist of a local file using the file system
    /// tag readers. Returns `None` if the file carries no cue sheet.
    pub fn try_open(path: &Path) -> Option<Self> {
        Self::try_open_with(&FileTagScanner, path, LocatorOptions::default())
    }

    pub fn try_open_with(
        scanner: &dyn TagScanner,
        path: &Path,
        options: LocatorOptions,
    ) -> Option<Self> {
        // only local files are supported
        if !path.is_absolute() {
            warn!("Refusing relative path {path:?}");
            return None;
        }

        let filename = path.file_name()?.to_string_lossy().into_owned();

        let Some(cuesheet) = locate_cuesheet(scanner, path, options) else {
            debug!("No CUESHEET tag in {path:?}");
            return None;
        };

        Some(Self::new(filename, cuesheet))
    }

    pub fn new(filename: impl Into<String>, cuesheet: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            cuesheet: cuesheet.into(),
            next: 0,
            parser: CueParser::new(),
            state: State::Feeding,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Pulls the next song, feeding as many lines as it takes.
    pub fn next_song(&mut self) -> Option<Song> {
        loop {
            match self.state {
                State::Feeding => {
                    if let Some(song) = self.parser.get() {
                        return Some(self.rewrite(song));
                    }

                    match self.next_line() {
                        Some(line) => self.parser.feed(&self.cuesheet[line]),
                        None => {
                            self.parser.finish();
                            self.state = State::Finishing;
                        }
                    }
                }
                State::Finishing => match self.parser.get() {
                    Some(song) => return Some(self.rewrite(song)),
                    None => self.state = State::Done,
                },
                State::Done => return None,
            }
        }
    }

    /// Bounds of the next line, without its CR or LF. A CRLF pair yields
    /// an empty line in between, which the parser skips.
    fn next_line(&mut self) -> Option<Range<usize>> {
        let start = self.next;
        if start >= self.cuesheet.len() {
            return None;
        }

        let rest = &self.cuesheet.as_bytes()[start..];
        let line = match memchr::memchr2(b'\r', b'\n', rest) {
            Some(eol) => {
                self.next = start + eol + 1;
                start..start + eol
            }
            None => {
                self.next = self.cuesheet.len();
                start..self.cuesheet.len()
            }
        };

        Some(line)
    }

    fn rewrite(&self, mut song: Song) -> Song {
        song.uri.clone_from(&self.filename);
        song
    }
}

impl Iterator for EmbeddedCuePlaylist {
    type Item = Song;

    fn next(&mut self) -> Option<Song> {
        self.next_song()
    }
}

impl FusedIterator for EmbeddedCuePlaylist {}
