/*!
resource: the on-disk addressing scheme — directories, volumes, resource
framing, and the script/view parsers built on top of them (spec §3, §4.1-§4.5,
§6).
*/

pub mod directory;
pub mod frame;
pub mod reader;
pub mod script;
pub mod view;
pub mod volume;

pub use directory::DirEntry;
pub use script::{Script, ScriptLoader};
pub use view::{Cel, Loop, View, ViewLoader};
pub use volume::VolumeCache;

use std::fs;
use std::path::Path;

use crate::error::Result;

/// The four on-disk directory files a game directory carries (spec §6).
pub struct ResourceSet {
    pub volumes: VolumeCache,
    pub logics: ScriptLoader,
    pub pictures: PictureLoader,
    pub views: ViewLoader,
    // SNDDIR is parsed (so indices line up and `load.sound`-family opcodes
    // can validate arguments) but sound payloads are never decoded; the
    // sound backend is out of scope (spec §1).
    pub sounds: Vec<DirEntry>,
}

/// Picture resources are loaded raw (just framed) since the picture
/// *decoder* (§4.6) interprets them directly against a `Framebuffer`
/// rather than producing an intermediate owned type like `Script`/`View`.
pub struct PictureLoader {
    entries: Vec<DirEntry>,
}

impl PictureLoader {
    pub fn new(entries: Vec<DirEntry>) -> Self {
        Self { entries }
    }

    pub fn entry(&self, index: u8) -> Result<DirEntry> {
        self.entries
            .get(index as usize)
            .copied()
            .ok_or(crate::error::AgiError::NoSuchResource {
                kind: crate::error::ResourceKind::Picture,
                index,
            })
    }
}

impl ResourceSet {
    /// Open a game directory: parse `LOGDIR`/`PICDIR`/`VIEWDIR`/`SNDDIR` and
    /// prepare lazy volume access. No `VOL.*` file is read until the first
    /// resource is requested.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref();
        let logics = directory::parse(&fs::read(root.join("LOGDIR"))?)?;
        let pictures = directory::parse(&fs::read(root.join("PICDIR"))?)?;
        let views = directory::parse(&fs::read(root.join("VIEWDIR"))?)?;
        let sounds = directory::parse(&fs::read(root.join("SNDDIR"))?)?;

        Ok(Self {
            volumes: VolumeCache::new(root),
            logics: ScriptLoader::new(logics),
            pictures: PictureLoader::new(pictures),
            views: ViewLoader::new(views),
            sounds,
        })
    }

    /// Fetch (loading and caching on first reference) logic script
    /// `index`.
    pub fn logic(&mut self, index: u8) -> Result<std::rc::Rc<Script>> {
        self.logics.get(&mut self.volumes, index)
    }

    /// Fetch (loading and caching on first reference) view `index`.
    pub fn view(&mut self, index: u8) -> Result<std::rc::Rc<View>> {
        self.views.get(&mut self.volumes, index)
    }

    /// Frame picture resource `index` and return its raw command-stream
    /// payload, for `render::picture::decode` to interpret directly.
    pub fn picture_payload(&mut self, index: u8) -> Result<&[u8]> {
        let entry = self.pictures.entry(index)?;
        let volume = self.volumes.get(entry.volume)?;
        frame::frame(volume, entry.offset as usize)
    }
}
