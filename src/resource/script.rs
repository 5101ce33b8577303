/*!
script: logic-script parsing, message table decryption, and the script cache
(spec §4.4).

A `Script` owns its code slice and a decrypted message string buffer; it is
cached by logic index and shared (via `Rc`) with any VM frame executing it —
loading a different logic resource never evicts one still on the call stack
(spec §3, "Ownership").
*/

use std::rc::Rc;

use crate::error::{AgiError, ResourceKind, Result};
use crate::resource::directory::DirEntry;
use crate::resource::frame::frame;
use crate::resource::reader::ByteReader;
use crate::resource::volume::VolumeCache;

/// The XOR keystream used to obfuscate logic-script message tables.
const KEYSTREAM: &[u8] = b"Avis Durgan";

fn decrypt(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, &b)| b ^ KEYSTREAM[i % KEYSTREAM.len()])
        .collect()
}

/// A parsed logic resource: bytecode plus an obfuscated-then-decrypted
/// message table.
#[derive(Debug)]
pub struct Script {
    pub index: u8,
    code: Vec<u8>,
    strings: Vec<u8>,
    /// 1-based message pointers into `strings`; `messages[0]` is message 1.
    /// `None` means the message is absent ("no-op" to reference).
    messages: Vec<Option<usize>>,
}

impl Script {
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Look up message `i` (1-based; 0 always means "no message" and is
    /// never dereferenced by callers). Returns the NUL-terminated text
    /// without the trailing NUL, or `None` if absent or out of range.
    pub fn message(&self, i: u8) -> Option<&str> {
        if i == 0 {
            return None;
        }
        let pos = *self.messages.get(i as usize - 1)?.as_ref()?;
        let tail = &self.strings[pos..];
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        std::str::from_utf8(&tail[..end]).ok()
    }
}

/// Parse a logic resource payload into a `Script`, per spec §4.4.
fn parse(payload: &[u8], index: u8) -> Result<Script> {
    let bad = |reason: &'static str| AgiError::MalformedScript { reason };

    let mut r = ByteReader::new(payload);
    let text_offset = r.u16_le().map_err(|_| bad("missing text offset"))? as usize;
    let mstart = text_offset + 2;
    if mstart >= payload.len() {
        return Err(bad("message table start out of range"));
    }
    let mc = payload[mstart] as usize;
    if mstart + 3 > payload.len() {
        return Err(bad("message table header out of range"));
    }
    let mend = {
        let mut mr = ByteReader::new(payload);
        mr.seek(mstart + 1)?;
        mr.u16_le().map_err(|_| bad("message end out of range"))? as usize + mstart + 1
    };
    let mdata = mstart + 3 + mc * 2;
    if mend > payload.len() || mdata > mend {
        return Err(bad("message data region out of range"));
    }
    if mstart < 2 || mstart > payload.len() {
        return Err(bad("code slice out of range"));
    }

    let code = payload[2..mstart].to_vec();
    let strings = decrypt(&payload[mdata..mend]);

    let mut messages = Vec::with_capacity(mc);
    for i in 0..mc {
        let off_pos = mstart + 3 + i * 2;
        if off_pos + 2 > payload.len() {
            return Err(bad("message offset table out of range"));
        }
        let mut or = ByteReader::new(payload);
        or.seek(off_pos)?;
        let offset = or.u16_le()? as usize;
        let pos = mstart + offset + 1;
        if pos < mdata {
            messages.push(None);
        } else {
            let rel = pos - mdata;
            if rel > strings.len() {
                return Err(bad("message pointer out of range"));
            }
            messages.push(Some(rel));
        }
    }

    Ok(Script { index, code, strings, messages })
}

/// Caches parsed logic scripts by index, loading and decrypting on first
/// reference.
pub struct ScriptLoader {
    entries: Vec<DirEntry>,
    cache: Vec<Option<Rc<Script>>>,
}

impl ScriptLoader {
    pub fn new(entries: Vec<DirEntry>) -> Self {
        let cache = vec![None; entries.len()];
        Self { entries, cache }
    }

    /// Return the cached script, loading it from `volumes` on first
    /// reference (spec: "created on first `load.logic` or first implicit
    /// access and thereafter reused").
    pub fn get(&mut self, volumes: &mut VolumeCache, index: u8) -> Result<Rc<Script>> {
        if let Some(script) = &self.cache[index as usize] {
            return Ok(Rc::clone(script));
        }
        let entry = self.entries.get(index as usize).ok_or(AgiError::NoSuchResource {
            kind: ResourceKind::Logic,
            index,
        })?;
        let volume = volumes.get(entry.volume)?;
        let payload = frame(volume, entry.offset as usize)?;
        let script = Rc::new(parse(payload, index)?);
        self.cache[index as usize] = Some(Rc::clone(&script));
        Ok(script)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encrypted(plain: &[u8]) -> Vec<u8> {
        plain
            .iter()
            .enumerate()
            .map(|(i, &b)| b ^ KEYSTREAM[i % KEYSTREAM.len()])
            .collect()
    }

    #[test]
    fn decrypt_round_trips_and_matches_sample() {
        let cipher = [0x27, 0x21, 0x22, 0x27, 0x4F, 0x48, 0x13];
        let plain = decrypt(&cipher);
        assert_eq!(plain, b"fooBAR\0");
        assert_eq!(decrypt(&plain), cipher);
    }

    #[test]
    fn parses_a_minimal_script_with_one_message() {
        // code: two NOPs (0x00 isn't meaningful here, just payload bytes)
        let code = [0xAAu8, 0xBB];
        let message = b"hi\0";
        let cipher = encrypted(message);

        // layout: [text_offset_le(2)] [code...] [mc(1)] [mend_le(2)] [offsets...] [cipher...]
        let mut payload = Vec::new();
        let text_offset: u16 = code.len() as u16; // mstart = text_offset + 2
        payload.extend_from_slice(&text_offset.to_le_bytes());
        payload.extend_from_slice(&code);
        let mstart = payload.len();
        assert_eq!(mstart, text_offset as usize + 2);
        payload.push(1); // mc
        let mdata = mstart + 3 + 1 * 2;
        let mend_field = (mdata + cipher.len()) - mstart - 1;
        payload.extend_from_slice(&(mend_field as u16).to_le_bytes());
        // offset such that pos = mstart + offset + 1 == mdata
        let offset = mdata - mstart - 1;
        payload.extend_from_slice(&(offset as u16).to_le_bytes());
        payload.extend_from_slice(&cipher);

        let script = parse(&payload, 0).unwrap();
        assert_eq!(script.code(), &code);
        assert_eq!(script.message(1), Some("hi"));
        assert_eq!(script.message(0), None);
    }
}
