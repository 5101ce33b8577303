/*!
Error taxonomy for the AGI core (see spec §7).

Every fallible boundary in the resource layer (byte reader, directory codec,
resource framing, script loader, view parser) and the logic VM (fetch/decode)
returns `Result<T, AgiError>`. The variants map directly onto the error kinds
needed at each boundary; nothing here is invented beyond what a caller
needs to distinguish "which boundary failed and on what resource".
*/

use std::fmt;

/// A resource kind, used to qualify `NoSuchResource` and friends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Logic,
    Picture,
    View,
    Sound,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Logic => "logic",
            ResourceKind::Picture => "picture",
            ResourceKind::View => "view",
            ResourceKind::Sound => "sound",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AgiError {
    #[error("no such {kind} resource at index {index}")]
    NoSuchResource { kind: ResourceKind, index: u8 },

    #[error("resource header magic mismatch at offset {offset}")]
    BadMagic { offset: usize },

    #[error("resource body truncated: wanted {wanted} bytes, had {available}")]
    TruncatedResource { wanted: usize, available: usize },

    #[error("directory file size {size} is not a multiple of 3")]
    MalformedDirectory { size: usize },

    #[error("malformed script: {reason}")]
    MalformedScript { reason: &'static str },

    #[error("malformed view: {reason}")]
    MalformedView { reason: &'static str },

    #[error("seek target {target} exceeds buffer length {len}")]
    InvalidOffset { target: usize, len: usize },

    #[error("script fetch/decode ran past the end of the code slice")]
    TruncatedScript,

    #[error("unknown opcode 0x{opcode:02x} at ip {ip}")]
    UnknownOpcode { opcode: u8, ip: usize },

    #[error("internal region inconsistency: {reason}")]
    InvalidRegion { reason: &'static str },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgiError>;
