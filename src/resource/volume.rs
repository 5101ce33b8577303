/*!
volume: lazy, retained cache of `VOL.0` .. `VOL.15` volume files.

A volume is an immutable byte buffer loaded from disk on first reference and
retained for the program lifetime (spec §3, §5: "shared-immutable after
load"). The cache never evicts, so a `ByteReader` or resource slice borrowed
from a volume remains valid as long as the `VolumeCache` itself is alive.
*/

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;

const MAX_VOLUMES: usize = 16;

/// Loads and retains `VOL.<n>` files by id, on demand.
pub struct VolumeCache {
    root: PathBuf,
    volumes: [Option<Vec<u8>>; MAX_VOLUMES],
}

impl VolumeCache {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            volumes: Default::default(),
        }
    }

    /// Return the bytes of volume `id` (0..15), loading it from disk the
    /// first time it is referenced.
    pub fn get(&mut self, id: u8) -> Result<&[u8]> {
        let idx = id as usize;
        if self.volumes[idx].is_none() {
            let path = self.root.join(format!("VOL.{id}"));
            debug!("loading volume {id} from {}", path.display());
            let bytes = fs::read(&path)?;
            self.volumes[idx] = Some(bytes);
        }
        Ok(self.volumes[idx].as_deref().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_retains_a_volume() {
        let dir = std::env::temp_dir().join(format!("agi-core-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("VOL.0");
        {
            let mut f = fs::File::create(&path).unwrap();
            f.write_all(&[1, 2, 3, 4]).unwrap();
        }
        let mut cache = VolumeCache::new(&dir);
        assert_eq!(cache.get(0).unwrap(), &[1, 2, 3, 4]);
        // second call is served from the retained buffer, not a second read
        assert_eq!(cache.get(0).unwrap(), &[1, 2, 3, 4]);
        fs::remove_dir_all(&dir).ok();
    }
}
