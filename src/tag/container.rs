//! Tags kept inside Ogg and MP4 containers: Vorbis comments of an Ogg
//! stream and the `ilst` items of an MP4 `moov` box.

use crate::tag::TagHandler;
use crate::tag::error::TagResult;
use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{TagItem, TagType};
use log::trace;
use std::path::Path;

pub fn scan_container_tags(path: &Path, handler: &mut dyn TagHandler) -> TagResult<()> {
    let tagged_file = Probe::open(path)?
        .options(ParseOptions::new().read_properties(false))
        .guess_file_type()?
        .read()?;

    for tag in tagged_file.tags() {
        trace!("Reading {:?} tag of {path:?}", tag.tag_type());
        for item in tag.items() {
            let (Some(key), Some(value)) = (item_key(item, tag.tag_type()), item.value().text())
            else {
                continue;
            };
            handler.on_pair(key, value);
        }
    }

    Ok(())
}

/// The key an item is stored under in its own tag format. iTunes freeform
/// atoms (`----:mean:name`) are reported by their name alone.
fn item_key(item: &TagItem, tag_type: TagType) -> Option<&str> {
    let key = item.key().map_key(tag_type, true)?;
    Some(match key.strip_prefix("----:") {
        Some(freeform) => freeform.rsplit(':').next().unwrap_or(freeform),
        None => key,
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::tag::tests::PairCollector;
    use std::io::Write;

    const OGG_SERIAL: u32 = 0x0EBC_0E00;
    const OGG_BEGIN_OF_STREAM: u8 = 0x02;
    const OGG_END_OF_STREAM: u8 = 0x04;

    fn ogg_crc(data: &[u8]) -> u32 {
        let mut crc = 0u32;
        for &byte in data {
            crc ^= (byte as u32) << 24;
            for _ in 0..8 {
                crc = if crc & 0x8000_0000 != 0 {
                    (crc << 1) ^ 0x04C1_1DB7
                } else {
                    crc << 1
                };
            }
        }
        crc
    }

    fn ogg_page(header_type: u8, sequence: u32, packets: &[&[u8]]) -> Vec<u8> {
        let mut lacing = Vec::new();
        for packet in packets {
            lacing.extend(std::iter::repeat_n(255u8, packet.len() / 255));
            lacing.push((packet.len() % 255) as u8);
        }

        let mut page = Vec::new();
        page.extend_from_slice(b"OggS");
        page.push(0); // version
        page.push(header_type);
        page.extend_from_slice(&0u64.to_le_bytes()); // granule position
        page.extend_from_slice(&OGG_SERIAL.to_le_bytes());
        page.extend_from_slice(&sequence.to_le_bytes());
        page.extend_from_slice(&[0u8; 4]); // checksum
        page.push(lacing.len() as u8);
        page.extend_from_slice(&lacing);
        for packet in packets {
            page.extend_from_slice(packet);
        }

        let crc = ogg_crc(&page);
        page[22..26].copy_from_slice(&crc.to_le_bytes());
        page
    }

    fn vorbis_identification() -> Vec<u8> {
        let mut packet = b"\x01vorbis".to_vec();
        packet.extend_from_slice(&0u32.to_le_bytes()); // version
        packet.push(2); // channels
        packet.extend_from_slice(&44_100u32.to_le_bytes());
        packet.extend_from_slice(&0i32.to_le_bytes()); // max bitrate
        packet.extend_from_slice(&128_000i32.to_le_bytes()); // nominal bitrate
        packet.extend_from_slice(&0i32.to_le_bytes()); // min bitrate
        packet.push(0xB8); // block sizes 256 and 2048
        packet.push(1); // framing
        packet
    }

    fn vorbis_comments(comments: &[&str]) -> Vec<u8> {
        let vendor = b"embcue tests";
        let mut packet = b"\x03vorbis".to_vec();
        packet.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        packet.extend_from_slice(vendor);
        packet.extend_from_slice(&(comments.len() as u32).to_le_bytes());
        for comment in comments {
            packet.extend_from_slice(&(comment.len() as u32).to_le_bytes());
            packet.extend_from_slice(comment.as_bytes());
        }
        packet.push(1); // framing
        packet
    }

    /// An Ogg Vorbis stream made of its three header packets.
    pub fn ogg_vorbis_file(comments: &[&str]) -> tempfile::NamedTempFile {
        let setup = b"\x05vorbis\x00";
        let mut file = tempfile::Builder::new().suffix(".ogg").tempfile().unwrap();
        file.write_all(&ogg_page(OGG_BEGIN_OF_STREAM, 0, &[vorbis_identification().as_slice()]))
            .unwrap();
        file.write_all(&ogg_page(
            OGG_END_OF_STREAM,
            1,
            &[vorbis_comments(comments).as_slice(), &setup[..]],
        ))
        .unwrap();
        file.flush().unwrap();
        file
    }

    fn mp4_atom(name: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut atom = ((body.len() + 8) as u32).to_be_bytes().to_vec();
        atom.extend_from_slice(name);
        atom.extend_from_slice(body);
        atom
    }

    /// An atom with a zero version and flags ahead of its body.
    fn mp4_full_atom(name: &[u8; 4], body: &[u8]) -> Vec<u8> {
        mp4_atom(name, &[&[0u8; 4][..], body].concat())
    }

    fn mp4_text_data(value: &str) -> Vec<u8> {
        let mut body = 1u32.to_be_bytes().to_vec(); // well-known type: UTF-8
        body.extend_from_slice(&0u32.to_be_bytes()); // locale
        body.extend_from_slice(value.as_bytes());
        mp4_atom(b"data", &body)
    }

    fn mp4_freeform(name: &str, value: &str) -> Vec<u8> {
        mp4_atom(
            b"----",
            &[
                mp4_full_atom(b"mean", b"com.apple.iTunes"),
                mp4_full_atom(b"name", name.as_bytes()),
                mp4_text_data(value),
            ]
            .concat(),
        )
    }

    /// An MP4 file with only `ftyp` and a `moov/udta/meta/ilst` chain.
    fn mp4_file(title: &str, freeform: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let mut ftyp = b"M4A ".to_vec();
        ftyp.extend_from_slice(&0u32.to_be_bytes());
        ftyp.extend_from_slice(b"M4A mp42isom");

        let mut hdlr = 0u32.to_be_bytes().to_vec();
        hdlr.extend_from_slice(b"mdirappl");
        hdlr.extend_from_slice(&[0u8; 9]);

        let mut ilst = mp4_atom(b"\xA9nam", &mp4_text_data(title));
        for (name, value) in freeform {
            ilst.extend_from_slice(&mp4_freeform(name, value));
        }

        let meta = mp4_full_atom(
            b"meta",
            &[mp4_full_atom(b"hdlr", &hdlr), mp4_atom(b"ilst", &ilst)].concat(),
        );
        let moov = mp4_atom(b"moov", &mp4_atom(b"udta", &meta));

        let mut file = tempfile::Builder::new().suffix(".m4a").tempfile().unwrap();
        file.write_all(&mp4_atom(b"ftyp", &ftyp)).unwrap();
        file.write_all(&moov).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reports_ogg_vorbis_comments() {
        let file = ogg_vorbis_file(&["TITLE=Live", "CUESHEET=TRACK 01 AUDIO\r\nTITLE \"A\""]);
        let mut collector = PairCollector::default();

        scan_container_tags(file.path(), &mut collector).unwrap();
        assert_eq!(collector.get("TITLE"), Some("Live"));
        assert_eq!(collector.get("CUESHEET"), Some("TRACK 01 AUDIO\r\nTITLE \"A\""));
    }

    #[test]
    fn reports_mp4_freeform_items_by_name() {
        let file = mp4_file("Live", &[("CUESHEET", "TRACK 01 AUDIO\nTITLE \"A\"")]);
        let mut collector = PairCollector::default();

        scan_container_tags(file.path(), &mut collector).unwrap();
        assert_eq!(collector.get("CUESHEET"), Some("TRACK 01 AUDIO\nTITLE \"A\""));
        assert!(collector.pairs.iter().any(|(_, value)| value == "Live"));
    }

    #[test]
    fn unrecognized_stream_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".ogg").tempfile().unwrap();
        file.write_all(b"OggS").unwrap();
        file.write_all(&[0u8; 200]).unwrap();
        file.flush().unwrap();
        let mut collector = PairCollector::default();

        assert!(scan_container_tags(file.path(), &mut collector).is_err());
        assert!(collector.pairs.is_empty());
    }
}
