//! APEv2 tags, as found at the end of Monkey's Audio, WavPack and
//! Musepack files (and sometimes appended to anything else).

use crate::tag::TagHandler;
use crate::tag::error::{TagError, TagResult};
use binrw::{BinRead, BinWrite, NullString};
use log::{debug, trace};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

pub const APE_FOOTER_SIZE: u32 = 32;
pub const ID3V1_SIZE: u64 = 128;
pub const MAX_APE_TAG_SIZE: u32 = 1024 * 1024;

#[derive(Debug, Clone, BinRead, BinWrite)]
#[brw(little, magic = b"APETAGEX")]
pub struct ApeFooter {
    /// 1000 for APEv1, 2000 for APEv2
    pub version: u32,

    /// Size of all items plus this footer, excluding the optional header
    pub tag_size: u32,

    pub item_count: u32,

    pub flags: u32,

    pub reserved: [u8; 8],
}

#[derive(Debug, Clone, BinRead, BinWrite)]
#[brw(little)]
pub struct ApeItem {
    #[br(assert(value_size <= MAX_APE_TAG_SIZE))]
    pub value_size: u32,

    /// Bits 1-2 hold the item type: text, binary or external locator
    pub flags: u32,

    pub key: NullString,

    #[br(count = value_size)]
    pub value: Vec<u8>,
}

impl ApeItem {
    const ITEM_TYPE_MASK: u32 = 0b110;

    pub fn is_text(&self) -> bool {
        self.flags & Self::ITEM_TYPE_MASK == 0
    }
}

pub fn scan_ape_tags(path: &Path, handler: &mut dyn TagHandler) -> TagResult<()> {
    let mut reader = BufReader::new(File::open(path)?);

    let Some((footer, footer_start)) = find_footer(&mut reader)? else {
        trace!("No APE tag in {path:?}");
        return Ok(());
    };

    if footer.tag_size < APE_FOOTER_SIZE
        || footer.tag_size > MAX_APE_TAG_SIZE
        || footer.tag_size as u64 > footer_start + APE_FOOTER_SIZE as u64
    {
        return Err(TagError::InvalidApeTagSize {
            path: path.to_path_buf(),
            size: footer.tag_size,
        });
    }

    let items_start = footer_start + APE_FOOTER_SIZE as u64 - footer.tag_size as u64;
    let mut items = vec![0u8; (footer.tag_size - APE_FOOTER_SIZE) as usize];
    reader.seek(SeekFrom::Start(items_start))?;
    reader.read_exact(&mut items)?;

    let mut cursor = Cursor::new(items);
    for _ in 0..footer.item_count {
        let item = match ApeItem::read(&mut cursor) {
            Ok(item) => item,
            Err(err) => {
                debug!("Stopping at truncated APE item in {path:?}: {err}");
                break;
            }
        };

        if !item.is_text() {
            continue;
        }

        let key = String::from_utf8_lossy(&item.key.0);
        let value = String::from_utf8_lossy(&item.value);
        handler.on_pair(&key, &value);
    }

    Ok(())
}

/// Looks for the footer at the very end, then in front of an ID3v1 tag.
fn find_footer<R: Read + Seek>(reader: &mut R) -> TagResult<Option<(ApeFooter, u64)>> {
    let len = reader.seek(SeekFrom::End(0))?;

    for trailer in [0, ID3V1_SIZE] {
        let Some(footer_start) = len.checked_sub(trailer + APE_FOOTER_SIZE as u64) else {
            continue;
        };

        reader.seek(SeekFrom::Start(footer_start))?;
        if let Ok(footer) = ApeFooter::read(reader) {
            return Ok(Some((footer, footer_start)));
        }
    }

    Ok(None)
}
