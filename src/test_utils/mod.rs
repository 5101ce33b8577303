//! Shared test utilities for building a minimal, synthetic AGI resource set
//! on disk.
//!
//! These helpers de-duplicate the on-disk layout (spec §6: `LOGDIR`/
//! `PICDIR`/`VIEWDIR`/`SNDDIR` directory files plus `VOL.0`) across tests in
//! the resource, VM, and interpreter modules. Everything here writes a
//! single-volume (`VOL.0`) game directory; that is all any test needs since
//! the volume cache is keyed by id, not by how many volumes a real game
//! ships.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

const KEYSTREAM: &[u8] = b"Avis Durgan";

fn encrypt(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, &b)| b ^ KEYSTREAM[i % KEYSTREAM.len()])
        .collect()
}

/// Build a logic-resource payload (spec §4.4) out of a code slice and a
/// list of plaintext messages (1-based; `messages[0]` is message 1).
pub fn build_logic_payload(code: &[u8], messages: &[&str]) -> Vec<u8> {
    let mc = messages.len();
    let mstart_placeholder_len = code.len() as u16;

    let mut payload = Vec::new();
    payload.extend_from_slice(&mstart_placeholder_len.to_le_bytes());
    payload.extend_from_slice(code);
    let mstart = payload.len();
    payload.push(mc as u8);

    let mdata = mstart + 3 + mc * 2;
    let mut strings = Vec::new();
    let mut offsets = Vec::with_capacity(mc);
    for m in messages {
        let pos_in_strings = strings.len();
        offsets.push(pos_in_strings);
        strings.extend_from_slice(m.as_bytes());
        strings.push(0);
    }
    let mend_field = (mdata + strings.len()) - mstart - 1;
    payload.extend_from_slice(&(mend_field as u16).to_le_bytes());
    for off in &offsets {
        let offset = (mdata + off) - mstart - 1;
        payload.extend_from_slice(&(offset as u16).to_le_bytes());
    }
    payload.extend_from_slice(&encrypt(&strings));
    payload
}

/// Build a single-loop, single-cel view payload (spec §4.5) out of one
/// cel's dimensions and a row-major pixel buffer (values normally 0..15,
/// matching `transparent` where the cel should show nothing).
pub fn build_view_payload(width: u8, height: u8, transparent: u8, pixels: &[u8]) -> Vec<u8> {
    assert_eq!(pixels.len(), width as usize * height as usize);

    let mut payload = vec![0u8, 0u8, 1u8, 0u8, 0u8];
    let loop_start = payload.len() + 2;
    payload.extend_from_slice(&(loop_start as u16).to_le_bytes());
    assert_eq!(payload.len(), loop_start);

    let cel_offset_in_loop = 1 + 2;
    payload.push(1u8); // celCount
    payload.extend_from_slice(&(cel_offset_in_loop as u16).to_le_bytes());

    payload.push(width);
    payload.push(height);
    payload.push(transparent & 0x0f); // flags: colorKey only, not mirrored

    for row in 0..height as usize {
        let mut x = 0usize;
        while x < width as usize {
            let color = pixels[row * width as usize + x];
            let mut count = 1usize;
            while x + count < width as usize
                && count < 15
                && pixels[row * width as usize + x + count] == color
            {
                count += 1;
            }
            payload.push(((color & 0x0f) << 4) | (count as u8 & 0x0f));
            x += count;
        }
        payload.push(0x00); // end of row
    }
    payload
}

/// Frame a raw payload with the §4.3 5-byte header: big-endian magic
/// `0x1234`, an (unused by the reader) owning-volume byte, and a
/// little-endian 16-bit length.
fn frame_resource(payload: &[u8], volume_tag: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(5 + payload.len());
    out.extend_from_slice(&0x1234u16.to_be_bytes());
    out.push(volume_tag);
    out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn encode_directory(offsets: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(offsets.len() * 3);
    for &offset in offsets {
        let b0 = ((offset >> 16) & 0x0f) as u8; // volume 0 in the high nibble
        let b1 = ((offset >> 8) & 0xff) as u8;
        let b2 = (offset & 0xff) as u8;
        out.extend_from_slice(&[b0, b1, b2]);
    }
    out
}

/// A complete synthetic resource set: a temporary directory holding
/// `LOGDIR`/`PICDIR`/`VIEWDIR`/`SNDDIR` and a single `VOL.0` with every
/// resource's payload framed and concatenated, in directory-index order.
pub struct SyntheticGame {
    pub dir: PathBuf,
}

impl Drop for SyntheticGame {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Write a synthetic game directory under the system temp dir (unique per
/// call) and return a handle that cleans itself up when dropped.
///
/// `logics`/`pictures`/`views` are each the already-encoded resource
/// payload (see [`build_logic_payload`], [`build_view_payload`], or a raw
/// picture command stream) for every resource of that kind, in index
/// order. `sounds` only needs to exist so `SNDDIR` parses; pass an empty
/// slice unless a test cares about sound indices lining up.
pub fn build_resource_set(
    logics: &[Vec<u8>],
    pictures: &[Vec<u8>],
    views: &[Vec<u8>],
    sounds: &[Vec<u8>],
) -> SyntheticGame {
    let dir = std::env::temp_dir().join(format!(
        "agi-core-test-{}-{}",
        std::process::id(),
        unique_suffix()
    ));
    fs::create_dir_all(&dir).expect("create synthetic game dir");

    let mut volume = Vec::new();
    let mut log_offsets = Vec::new();
    let mut pic_offsets = Vec::new();
    let mut view_offsets = Vec::new();
    let mut snd_offsets = Vec::new();

    for payload in logics {
        log_offsets.push(volume.len() as u32);
        volume.extend_from_slice(&frame_resource(payload, 0));
    }
    for payload in pictures {
        pic_offsets.push(volume.len() as u32);
        volume.extend_from_slice(&frame_resource(payload, 0));
    }
    for payload in views {
        view_offsets.push(volume.len() as u32);
        volume.extend_from_slice(&frame_resource(payload, 0));
    }
    for payload in sounds {
        snd_offsets.push(volume.len() as u32);
        volume.extend_from_slice(&frame_resource(payload, 0));
    }

    fs::write(dir.join("LOGDIR"), encode_directory(&log_offsets)).unwrap();
    fs::write(dir.join("PICDIR"), encode_directory(&pic_offsets)).unwrap();
    fs::write(dir.join("VIEWDIR"), encode_directory(&view_offsets)).unwrap();
    fs::write(dir.join("SNDDIR"), encode_directory(&snd_offsets)).unwrap();
    fs::write(dir.join("VOL.0"), &volume).unwrap();

    SyntheticGame { dir }
}

fn unique_suffix() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceSet;

    #[test]
    fn builds_a_loadable_game_directory() {
        let logic = build_logic_payload(&[0x00], &["hello"]);
        let game = build_resource_set(&[logic], &[], &[], &[]);
        let mut resources = ResourceSet::open(&game.dir).unwrap();
        let script = resources.logic(0).unwrap();
        assert_eq!(script.code(), &[0x00]);
        assert_eq!(script.message(1), Some("hello"));
    }

    #[test]
    fn builds_a_loadable_view() {
        let view_payload = build_view_payload(2, 1, 0, &[3, 3]);
        let game = build_resource_set(&[], &[], &[view_payload], &[]);
        let mut resources = ResourceSet::open(&game.dir).unwrap();
        let view = resources.view(0).unwrap();
        assert_eq!(view.loops[0].cels[0].pixels, vec![3, 3]);
    }
}
