/*!
frame: resource header framing (spec §4.3).

Every resource embedded in a volume begins with a 5-byte header: a
big-endian `0x1234` magic, one "owning volume" byte (ignored here — the
directory already told the caller which volume and offset to use), and a
little-endian 16-bit payload length. `frame` validates the header and
returns a borrowed slice of exactly that many payload bytes.
*/

use crate::error::{AgiError, Result};
use crate::resource::reader::ByteReader;

const MAGIC: u16 = 0x1234;

/// Validate the 5-byte resource header at `offset` in `volume` and return
/// the inner payload slice.
pub fn frame(volume: &[u8], offset: usize) -> Result<&[u8]> {
    let mut r = ByteReader::new(volume);
    r.seek(offset)?;
    let header_start = r.position();
    let magic = r.u16_be()?;
    if magic != MAGIC {
        return Err(AgiError::BadMagic { offset: header_start });
    }
    let _owning_volume = r.u8()?;
    let length = r.u16_le()? as usize;
    let body_offset = r.position();
    if volume.len() < body_offset + length {
        return Err(AgiError::TruncatedResource {
            wanted: length,
            available: volume.len().saturating_sub(body_offset),
        });
    }
    Ok(&volume[body_offset..body_offset + length])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_a_valid_resource() {
        let mut data = vec![0x12, 0x34, 0x00, 0x07, 0x00];
        data.extend_from_slice(b"ABCDEFG");
        assert_eq!(frame(&data, 0).unwrap(), b"ABCDEFG");
    }

    #[test]
    fn off_by_one_short_is_truncated() {
        let mut data = vec![0x12, 0x34, 0x00, 0x07, 0x00];
        data.extend_from_slice(b"ABCDEF"); // one byte short
        assert!(matches!(frame(&data, 0), Err(AgiError::TruncatedResource { .. })));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(frame(&data, 0), Err(AgiError::BadMagic { .. })));
    }
}
