use crate::tag::TagHandler;
use crate::tag::error::TagResult;
use claxon::{FlacReader, FlacReaderOptions};
use std::path::Path;

/// Reports the Vorbis comments of a native FLAC stream. Only the metadata
/// blocks are read, audio frames are never touched.
pub fn scan_flac_tags(path: &Path, handler: &mut dyn TagHandler) -> TagResult<()> {
    let options = FlacReaderOptions {
        metadata_only: true,
        read_vorbis_comment: true,
    };
    let reader = FlacReader::open_ext(path, options)?;

    for (key, value) in reader.tags() {
        handler.on_pair(key, value);
    }

    Ok(())
}
