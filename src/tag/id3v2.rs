//! ID3v2 frames as tag pairs.
//!
//! `TXXX` frames are reported under their description (that's where
//! taggers put `CUESHEET`), other text frames under their frame id.

use crate::tag::TagHandler;
use crate::tag::error::TagResult;
use id3::frame::Content;
use id3::{ErrorKind, Tag};
use log::debug;
use std::path::Path;

pub fn scan_id3_tags(path: &Path, handler: &mut dyn TagHandler) -> TagResult<()> {
    let tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(err) if matches!(err.kind, ErrorKind::NoTag) => return Ok(()),
        Err(err) => match err.partial_tag {
            Some(tag) => {
                debug!("Using partially read ID3 tag of {path:?}: {}", err.description);
                tag
            }
            None => return Err(err.into()),
        },
    };

    report_frames(&tag, handler);
    Ok(())
}

fn report_frames(tag: &Tag, handler: &mut dyn TagHandler) {
    for frame in tag.frames() {
        match frame.content() {
            Content::ExtendedText(et) => handler.on_pair(&et.description, &et.value),
            Content::Text(text) if frame.id().starts_with('T') => {
                handler.on_pair(frame.id(), text)
            }
            _ => {}
        }
    }
}
