use serde::Serialize;

/// One logical track of a cue sheet.
///
/// `uri` is whatever the sheet's `FILE` command said; consumers that know
/// better (e.g. an embedded sheet, which always describes its own file)
/// overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Song {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Offset of `INDEX 01` inside the file
    pub start_ms: u64,
    /// Start of the following track, if it lives in the same file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_ms: Option<u64>,
}

impl Song {
    pub fn duration_ms(&self) -> Option<u64> {
        self.end_ms.map(|end| end.saturating_sub(self.start_ms))
    }
}

/// Disc position as minutes:seconds:frames, 75 frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MSF {
    pub minutes: u32,
    pub seconds: u8,
    pub frames: u8,
}

impl MSF {
    pub const FRAMES_PER_SECOND: u64 = 75;

    pub fn to_millis(&self) -> u64 {
        (self.minutes as u64 * 60 + self.seconds as u64) * 1000
            + self.frames as u64 * 1000 / Self::FRAMES_PER_SECOND
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackType {
    Audio,
    CdG,
    Mode1_2048,
    Mode1_2352,
    Mode2_2336,
    Mode2_2352,
    CdI2336,
    CdI2352,
}

impl TrackType {
    pub fn is_audio(&self) -> bool {
        matches!(self, TrackType::Audio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Binary,
    Motorola,
    Aiff,
    Wave,
    Mp3,
    Flac,
}

impl FileType {
    /// Raw data images; their tracks are not playable songs.
    pub fn is_data(&self) -> bool {
        matches!(self, FileType::Binary | FileType::Motorola)
    }
}
