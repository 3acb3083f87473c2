use crate::cue::error::{CueError, CueResult};
use crate::cue::models::{FileType, MSF, Song, TrackType};
use log::trace;
use std::collections::VecDeque;

pub mod error;
pub mod models;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Before the first `FILE`/`TRACK`, album-wide commands apply
    Header,
    /// After a `FILE`, waiting for its first `TRACK`
    Wait,
    /// Inside an audio track
    Track,
    /// Current `FILE` is a data image, skip until the next one
    IgnoreFile,
    /// Current `TRACK` is not audio, skip until the next one
    IgnoreTrack,
}

#[derive(Debug, Default)]
struct HeaderTags {
    album: Option<String>,
    performer: Option<String>,
    genre: Option<String>,
    date: Option<String>,
    comment: Option<String>,
}

/// Incremental cue sheet parser.
///
/// Lines are pushed in with [`CueParser::feed`] and finished tracks are
/// pulled out with [`CueParser::get`]. A track is only released once the
/// track after it has started, because its end offset is the next track's
/// `INDEX 01`; the last one needs [`CueParser::finish`].
#[derive(Debug)]
pub struct CueParser {
    state: ParserState,
    header: HeaderTags,
    filename: String,
    current: Option<Song>,
    previous: Option<Song>,
    completed: VecDeque<Song>,
    end: bool,
}

impl Default for CueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CueParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Header,
            header: HeaderTags::default(),
            filename: String::new(),
            current: None,
            previous: None,
            completed: VecDeque::new(),
            end: false,
        }
    }

    /// Feed one line, without its terminator. Lines that can't be parsed
    /// are skipped.
    pub fn feed(&mut self, line: &str) {
        debug_assert!(!self.end, "feed() called after finish()");

        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Err(err) = self.feed_line(line) {
            trace!("Skipping malformed cue line {line:?}: {err}");
        }
    }

    /// Signal that no more lines will follow. Must be called once.
    pub fn finish(&mut self) {
        debug_assert!(!self.end, "finish() called twice");

        self.commit();
        self.end = true;
    }

    /// Take the next completed track, if any.
    pub fn get(&mut self) -> Option<Song> {
        if self.completed.is_empty() && self.end {
            if let Some(song) = self.previous.take() {
                self.completed.push_back(song);
            }
        }

        self.completed.pop_front()
    }

    fn feed_line(&mut self, line: &str) -> CueResult<()> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim_start()),
            None => (line, ""),
        };

        match command {
            "REM" => self.parse_rem(rest)?,
            "TITLE" => {
                let title = self.extract_string(rest)?;
                match self.state {
                    ParserState::Header => self.header.album = Some(title),
                    ParserState::Track => {
                        if let Some(song) = &mut self.current {
                            song.title = Some(title);
                        }
                    }
                    _ => {}
                }
            }
            "PERFORMER" => {
                let performer = self.extract_string(rest)?;
                match self.state {
                    ParserState::Header => self.header.performer = Some(performer),
                    ParserState::Track => {
                        if let Some(song) = &mut self.current {
                            song.performer = Some(performer);
                        }
                    }
                    _ => {}
                }
            }
            "FILE" => {
                self.commit();

                let filename = self.extract_string(rest)?;
                let type_str = self.file_type_token(rest);
                let ignored = match type_str {
                    None => false,
                    Some(type_str) => self.parse_file_type(type_str).is_none_or(|t| t.is_data()),
                };

                self.filename = filename;
                self.state = if ignored {
                    trace!("Ignoring non-audio FILE {:?}", self.filename);
                    ParserState::IgnoreFile
                } else {
                    ParserState::Wait
                };
            }
            "TRACK" => {
                if self.state == ParserState::IgnoreFile {
                    return Ok(());
                }

                self.commit();
                self.state = ParserState::IgnoreTrack;

                let mut parts = rest.split_whitespace();
                let number = parts
                    .next()
                    .ok_or(CueError::MissingArgument("TRACK"))?
                    .parse::<u32>()?;
                let track_type = parts.next().map(|t| self.parse_track_type(t)).transpose()?;

                if track_type.is_some_and(|t| !t.is_audio()) {
                    return Ok(());
                }

                self.current = Some(self.new_song(number));
                self.state = ParserState::Track;
            }
            "INDEX" => {
                if self.state != ParserState::Track {
                    return Ok(());
                }

                let mut parts = rest.split_whitespace();
                let number = parts
                    .next()
                    .ok_or(CueError::MissingArgument("INDEX"))?
                    .parse::<u8>()?;
                let position = parts
                    .next()
                    .ok_or(CueError::MissingArgument("INDEX"))
                    .and_then(|msf| self.parse_msf(msf))?;

                // INDEX 00 marks the pregap, the song starts at 01
                if number != 1 {
                    return Ok(());
                }

                let start_ms = position.to_millis();
                if let Some(current) = &mut self.current {
                    current.start_ms = start_ms;

                    if let Some(previous) = &mut self.previous {
                        if previous.end_ms.is_none() && previous.uri == current.uri {
                            previous.end_ms = Some(start_ms);
                        }
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn parse_rem(&mut self, rest: &str) -> CueResult<()> {
        if self.state != ParserState::Header {
            return Ok(());
        }

        let (key, value) = match rest.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim_start()),
            None => return Ok(()),
        };

        let slot = match key {
            "GENRE" => &mut self.header.genre,
            "DATE" => &mut self.header.date,
            "COMMENT" => &mut self.header.comment,
            _ => return Ok(()),
        };
        *slot = Some(Self::unquote(value)?);

        Ok(())
    }

    /// Moves the track under construction to `previous`, releasing the one
    /// that was there.
    fn commit(&mut self) {
        let Some(current) = self.current.take() else {
            return;
        };

        if let Some(previous) = self.previous.replace(current) {
            self.completed.push_back(previous);
        }
    }

    fn new_song(&self, number: u32) -> Song {
        Song {
            uri: self.filename.clone(),
            track: Some(number),
            performer: self.header.performer.clone(),
            album: self.header.album.clone(),
            album_artist: self.header.performer.clone(),
            genre: self.header.genre.clone(),
            date: self.header.date.clone(),
            comment: self.header.comment.clone(),
            ..Song::default()
        }
    }

    fn extract_string(&self, rest: &str) -> CueResult<String> {
        if rest.starts_with('"') {
            return self.extract_quoted_string(rest);
        }

        rest.split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or(CueError::MissingArgument("string"))
    }

    fn extract_quoted_string(&self, line: &str) -> CueResult<String> {
        let start = line
            .find('"')
            .ok_or_else(|| CueError::InvalidQuotedString(line.to_string()))?;
        let end = line
            .rfind('"')
            .ok_or_else(|| CueError::InvalidQuotedString(line.to_string()))?;
        if start >= end {
            return Err(CueError::InvalidQuotedString(line.to_string()));
        }

        Ok(line[start + 1..end].to_string())
    }

    fn unquote(value: &str) -> CueResult<String> {
        let value = value.trim();
        match value.strip_prefix('"') {
            Some(inner) => inner
                .strip_suffix('"')
                .map(str::to_string)
                .ok_or_else(|| CueError::InvalidQuotedString(value.to_string())),
            None => Ok(value.to_string()),
        }
    }

    /// The token after the file name, e.g. `WAVE` in `FILE "a b.wav" WAVE`.
    fn file_type_token<'a>(&self, rest: &'a str) -> Option<&'a str> {
        let after_name = if rest.starts_with('"') {
            &rest[rest.rfind('"')? + 1..]
        } else {
            let (_, after) = rest.split_once(char::is_whitespace)?;
            after
        };

        after_name.split_whitespace().last()
    }

    fn parse_file_type(&self, type_str: &str) -> Option<FileType> {
        match type_str {
            "BINARY" => Some(FileType::Binary),
            "MOTOROLA" => Some(FileType::Motorola),
            "AIFF" => Some(FileType::Aiff),
            "WAVE" => Some(FileType::Wave),
            "MP3" => Some(FileType::Mp3),
            "FLAC" => Some(FileType::Flac),
            _ => None,
        }
    }

    fn parse_track_type(&self, type_str: &str) -> CueResult<TrackType> {
        match type_str {
            "AUDIO" => Ok(TrackType::Audio),
            "CDG" => Ok(TrackType::CdG),
            "MODE1/2048" => Ok(TrackType::Mode1_2048),
            "MODE1/2352" => Ok(TrackType::Mode1_2352),
            "MODE2/2336" => Ok(TrackType::Mode2_2336),
            "MODE2/2352" => Ok(TrackType::Mode2_2352),
            "CDI/2336" => Ok(TrackType::CdI2336),
            "CDI/2352" => Ok(TrackType::CdI2352),
            _ => Err(CueError::InvalidTrackType(type_str.to_string())),
        }
    }

    fn parse_msf(&self, msf_str: &str) -> CueResult<MSF> {
        let parts: Vec<&str> = msf_str.split(':').collect();
        if parts.len() != 3 {
            return Err(CueError::InvalidMSFFormat(msf_str.to_string()));
        }

        let msf = MSF {
            minutes: parts[0].parse()?,
            seconds: parts[1].parse()?,
            frames: parts[2].parse()?,
        };
        if msf.seconds >= 60 || msf.frames as u64 >= MSF::FRAMES_PER_SECOND {
            return Err(CueError::InvalidMSFFormat(msf_str.to_string()));
        }

        Ok(msf)
    }
}
